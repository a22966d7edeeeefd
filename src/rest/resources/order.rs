//! Order resource.
//!
//! Reads return [`Order`] with the status as sent by the API. The lifecycle
//! commands [`Orders::submit`], [`Orders::hold`], [`Orders::release`] and
//! [`Orders::cancel`] return a [`TaggedResponse<OrderStatus>`].
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::rest::resources::{CreateOrder, OrderLineItem};
//! use serde_json::json;
//!
//! let order = client
//!     .orders()
//!     .create(&CreateOrder::new("cus_1", vec![OrderLineItem::new("prod_1", 2)]))
//!     .await?;
//!
//! let open = client
//!     .orders()
//!     .list(json!({"status": "SUBMITTED", "limit": 50}))?
//!     .to_array(200)
//!     .await?;
//!
//! let held = client.orders().hold(&order.id, "address check").await?;
//! assert!(held.is(OrderStatus::OnHold));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::clients::HttpMethod;
use crate::rest::{
    AutoPager, Dispatcher, MethodSpec, MethodType, PageShape, Resource, ResourceError,
    ResourceStatus, TaggedResponse,
};

use super::{require_non_negative, require_non_negative_amount, require_present, to_body};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created but not yet submitted.
    Draft,
    /// Submitted and awaiting processing.
    Submitted,
    /// Being picked and packed.
    InProgress,
    /// Paused pending review.
    OnHold,
    /// Handed to a carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipment.
    Cancelled,
    /// Returned after delivery.
    Returned,
}

impl ResourceStatus for OrderStatus {
    const OBJECT: &'static str = "order";
    const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Submitted,
        Self::InProgress,
        Self::OnHold,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::InProgress => "IN_PROGRESS",
            Self::OnHold => "ON_HOLD",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Returned => "RETURNED",
        }
    }
}

/// A line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// The ordered product.
    pub product_id: String,

    /// Units ordered.
    pub quantity: i64,

    /// Price per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl OrderLineItem {
    /// Creates a line item for `quantity` units of `product_id`.
    #[must_use]
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price: None,
            sku: None,
        }
    }
}

/// An order as returned by read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// The order ID.
    pub id: String,

    /// The raw lifecycle status.
    #[serde(default)]
    pub status: String,

    /// The ordering customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// Ordered items.
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,

    /// Order total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,

    /// ISO currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// When the order was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the order was last updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Narrows the raw status.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnrecognizedStatus`] for an unknown status.
    pub fn status(&self) -> Result<OrderStatus, ResourceError> {
        OrderStatus::from_wire(&self.status)
    }
}

/// Parameters for [`Orders::create`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateOrder {
    /// The ordering customer (required).
    pub customer_id: String,

    /// Items to order (at least one).
    pub line_items: Vec<OrderLineItem>,

    /// ISO currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Free-form shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Value>,

    /// Internal notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateOrder {
    /// Creates parameters with the required fields set.
    #[must_use]
    pub fn new(customer_id: impl Into<String>, line_items: Vec<OrderLineItem>) -> Self {
        Self {
            customer_id: customer_id.into(),
            line_items,
            currency: None,
            shipping_address: None,
            notes: None,
        }
    }

    /// Checks required fields and amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ResourceError> {
        const RESOURCE: &str = "order";

        require_present(RESOURCE, "customer_id", &self.customer_id)?;
        if self.line_items.is_empty() {
            return Err(ResourceError::Validation {
                resource: RESOURCE,
                field: "line_items",
                reason: "must contain at least one item".to_string(),
            });
        }
        for item in &self.line_items {
            require_present(RESOURCE, "product_id", &item.product_id)?;
            require_non_negative(RESOURCE, "quantity", item.quantity)?;
            if let Some(price) = item.unit_price {
                require_non_negative_amount(RESOURCE, "unit_price", price)?;
            }
        }
        Ok(())
    }
}

/// Order operations.
#[derive(Clone, Debug)]
pub struct Orders {
    resource: Resource,
}

impl Orders {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        let resource = Resource::builder("Order", "orders")
            .standard_methods()
            .method(
                "search",
                MethodSpec::relative(HttpMethod::Post, "search")
                    .with_method_type(MethodType::Search)
                    .with_page_shape(PageShape::Offset),
            )
            .method("submit", MethodSpec::relative(HttpMethod::Post, "{id}/submit"))
            .method("hold", MethodSpec::relative(HttpMethod::Post, "{id}/hold"))
            .method("release", MethodSpec::relative(HttpMethod::Post, "{id}/release"))
            .method("cancel", MethodSpec::relative(HttpMethod::Post, "{id}/cancel"))
            .build(dispatcher);

        Self { resource }
    }

    /// Returns the underlying method table.
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Creates an order after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] without sending anything if
    /// `params` is invalid, or the request error otherwise.
    pub async fn create(&self, params: &CreateOrder) -> Result<Order, ResourceError> {
        params.validate()?;
        let body = to_body("order parameters", params)?;
        self.resource.call_as("create", vec![body]).await
    }

    /// Retrieves an order.
    ///
    /// # Errors
    ///
    /// Returns the request error, e.g. a 404 for an unknown ID.
    pub async fn get(&self, id: &str) -> Result<Order, ResourceError> {
        self.resource.call_as("retrieve", vec![json!(id)]).await
    }

    /// Updates an order with the given fields.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn update(&self, id: &str, changes: Value) -> Result<Order, ResourceError> {
        self.resource
            .call_as("update", vec![json!(id), changes])
            .await
    }

    /// Deletes an order, returning the API's confirmation payload.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn delete(&self, id: &str) -> Result<Value, ResourceError> {
        self.resource.call("del", vec![json!(id)]).await
    }

    /// Lists orders matching `filters` (sent as query parameters).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::OptionConflict`] for conflicting options.
    pub fn list(&self, filters: Value) -> Result<AutoPager<Order>, ResourceError> {
        self.resource.paginate("list", vec![filters])
    }

    /// Searches orders. Results are offset-paginated.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::OptionConflict`] for conflicting options.
    pub fn search(&self, query: Value) -> Result<AutoPager<Order>, ResourceError> {
        self.resource.paginate("search", vec![query])
    }

    /// Submits a draft order.
    ///
    /// # Errors
    ///
    /// Returns the request error or [`ResourceError::UnrecognizedStatus`].
    pub async fn submit(&self, id: &str) -> Result<TaggedResponse<OrderStatus>, ResourceError> {
        self.resource.command("submit", vec![json!(id)]).await
    }

    /// Puts an order on hold.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] if `reason` is blank, the
    /// request error, or [`ResourceError::UnrecognizedStatus`].
    pub async fn hold(
        &self,
        id: &str,
        reason: &str,
    ) -> Result<TaggedResponse<OrderStatus>, ResourceError> {
        require_present("order", "reason", reason)?;
        self.resource
            .command("hold", vec![json!(id), json!({ "reason": reason })])
            .await
    }

    /// Releases an order from hold.
    ///
    /// # Errors
    ///
    /// Returns the request error or [`ResourceError::UnrecognizedStatus`].
    pub async fn release(&self, id: &str) -> Result<TaggedResponse<OrderStatus>, ResourceError> {
        self.resource.command("release", vec![json!(id)]).await
    }

    /// Cancels an order.
    ///
    /// # Errors
    ///
    /// Returns the request error or [`ResourceError::UnrecognizedStatus`].
    pub async fn cancel(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<TaggedResponse<OrderStatus>, ResourceError> {
        let mut args = vec![json!(id)];
        if let Some(reason) = reason {
            args.push(json!({ "reason": reason }));
        }
        self.resource.command("cancel", args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_complete_order() {
        let params = CreateOrder::new("cus_1", vec![OrderLineItem::new("prod_1", 2)]);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_customer_and_items() {
        let missing_customer = CreateOrder::new("", vec![OrderLineItem::new("prod_1", 1)]);
        assert!(matches!(
            missing_customer.validate(),
            Err(ResourceError::Validation {
                field: "customer_id",
                ..
            })
        ));

        let no_items = CreateOrder::new("cus_1", vec![]);
        assert!(matches!(
            no_items.validate(),
            Err(ResourceError::Validation {
                field: "line_items",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        let negative_quantity = CreateOrder::new("cus_1", vec![OrderLineItem::new("prod_1", -3)]);
        assert!(matches!(
            negative_quantity.validate(),
            Err(ResourceError::Validation {
                field: "quantity",
                ..
            })
        ));

        let mut item = OrderLineItem::new("prod_1", 1);
        item.unit_price = Some(-0.01);
        let negative_price = CreateOrder::new("cus_1", vec![item]);
        assert!(matches!(
            negative_price.validate(),
            Err(ResourceError::Validation {
                field: "unit_price",
                ..
            })
        ));

        let mut item = OrderLineItem::new("prod_1", 1);
        item.unit_price = Some(f64::NAN);
        let nan_price = CreateOrder::new("cus_1", vec![item]);
        assert!(matches!(
            nan_price.validate(),
            Err(ResourceError::Validation {
                field: "unit_price",
                ..
            })
        ));
    }

    #[test]
    fn test_order_deserializes_with_raw_status_and_extra_fields() {
        let order: Order = serde_json::from_value(json!({
            "id": "ord_1",
            "status": "ON_HOLD",
            "customer_id": "cus_1",
            "line_items": [{"product_id": "prod_1", "quantity": 2}],
            "created_at": "2024-03-01T12:00:00Z",
            "channel": "web"
        }))
        .unwrap();

        assert_eq!(order.status, "ON_HOLD");
        assert_eq!(order.status().unwrap(), OrderStatus::OnHold);
        assert_eq!(order.line_items[0].quantity, 2);
        assert!(order.created_at.is_some());
        assert_eq!(order.extra["channel"], "web");
    }

    #[test]
    fn test_order_status_wire_names_match_serde() {
        for status in OrderStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
    }
}

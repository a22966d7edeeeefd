//! Shipment resource.
//!
//! Shipment listings use offset pagination (`{items, total, limit, offset}`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::clients::HttpMethod;
use crate::rest::{
    AutoPager, Dispatcher, MethodSpec, MethodType, PageShape, Resource, ResourceError,
    ResourceStatus, TaggedResponse,
};

use super::{require_non_negative, require_non_negative_amount, require_present, to_body};

/// Lifecycle status of a shipment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Created, no label yet.
    Pending,
    /// Label purchased.
    LabelCreated,
    /// Picked up by the carrier.
    Shipped,
    /// Moving through the carrier network.
    InTransit,
    /// On the final delivery vehicle.
    OutForDelivery,
    /// Delivered.
    Delivered,
    /// Carrier reported a problem.
    Exception,
    /// Cancelled before pickup.
    Cancelled,
}

impl ResourceStatus for ShipmentStatus {
    const OBJECT: &'static str = "shipment";
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::LabelCreated,
        Self::Shipped,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Exception,
        Self::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::LabelCreated => "LABEL_CREATED",
            Self::Shipped => "SHIPPED",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Exception => "EXCEPTION",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// An order line included in a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipmentItem {
    /// The order line item.
    pub line_item_id: String,
    /// Units shipped.
    pub quantity: i64,
}

/// A shipment as returned by read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shipment {
    /// The shipment ID.
    pub id: String,

    /// The raw lifecycle status.
    #[serde(default)]
    pub status: String,

    /// The order being shipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Carrier name (e.g. `ups`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    /// Carrier tracking number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,

    /// Package weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(default)]
    pub items: Vec<ShipmentItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters for [`Shipments::create`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateShipment {
    /// The order being shipped (required).
    pub order_id: String,
    /// Carrier name (required).
    pub carrier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ShipmentItem>,
}

impl CreateShipment {
    /// Creates parameters with the required fields set.
    #[must_use]
    pub fn new(order_id: impl Into<String>, carrier: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            carrier: carrier.into(),
            service_level: None,
            weight: None,
            items: Vec::new(),
        }
    }

    /// Checks required fields, weight and item quantities.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ResourceError> {
        const RESOURCE: &str = "shipment";

        require_present(RESOURCE, "order_id", &self.order_id)?;
        require_present(RESOURCE, "carrier", &self.carrier)?;
        if let Some(weight) = self.weight {
            require_non_negative_amount(RESOURCE, "weight", weight)?;
        }
        for item in &self.items {
            require_present(RESOURCE, "line_item_id", &item.line_item_id)?;
            require_non_negative(RESOURCE, "quantity", item.quantity)?;
        }
        Ok(())
    }
}

/// Shipment operations.
///
/// `get`, `list` and `track` return raw entities; `ship`, `deliver` and
/// `cancel` return tagged responses.
#[derive(Clone, Debug)]
pub struct Shipments {
    resource: Resource,
}

impl Shipments {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        let resource = Resource::builder("Shipment", "shipments")
            .standard_methods()
            .method(
                "list",
                MethodSpec::relative(HttpMethod::Get, "")
                    .with_method_type(MethodType::List)
                    .with_page_shape(PageShape::Offset),
            )
            .method("ship", MethodSpec::relative(HttpMethod::Post, "{id}/ship"))
            .method("deliver", MethodSpec::relative(HttpMethod::Post, "{id}/deliver"))
            .method("cancel", MethodSpec::relative(HttpMethod::Post, "{id}/cancel"))
            .build(dispatcher);

        Self { resource }
    }

    /// Returns the underlying method table.
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Creates a shipment after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] without sending anything if
    /// `params` is invalid, or the request error otherwise.
    pub async fn create(&self, params: &CreateShipment) -> Result<Shipment, ResourceError> {
        params.validate()?;
        let body = to_body("shipment parameters", params)?;
        self.resource.call_as("create", vec![body]).await
    }

    /// Retrieves a shipment.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn get(&self, id: &str) -> Result<Shipment, ResourceError> {
        self.resource.call_as("retrieve", vec![json!(id)]).await
    }

    /// Lists shipments matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::OptionConflict`] for conflicting options.
    pub fn list(&self, filters: Value) -> Result<AutoPager<Shipment>, ResourceError> {
        self.resource.paginate("list", vec![filters])
    }

    /// Looks up carrier tracking events by tracking number.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] for a blank tracking number, or
    /// the request error.
    pub async fn track(&self, tracking_number: &str) -> Result<Value, ResourceError> {
        require_present("shipment", "tracking_number", tracking_number)?;
        let spec = MethodSpec::builder(HttpMethod::Get)
            .full_path("/tracking/{trackingNumber}")
            .build()?;
        self.resource
            .dispatcher()
            .request(self.resource.path(), &spec, vec![json!(tracking_number)])
            .await
    }

    /// Marks a shipment as handed to the carrier.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] for a blank tracking number, the
    /// request error, or [`ResourceError::UnrecognizedStatus`].
    pub async fn ship(
        &self,
        id: &str,
        tracking_number: &str,
    ) -> Result<TaggedResponse<ShipmentStatus>, ResourceError> {
        require_present("shipment", "tracking_number", tracking_number)?;
        self.resource
            .command(
                "ship",
                vec![json!(id), json!({ "tracking_number": tracking_number })],
            )
            .await
    }

    /// Marks a shipment as delivered, at `delivered_at` or now.
    ///
    /// # Errors
    ///
    /// Returns the request error or [`ResourceError::UnrecognizedStatus`].
    pub async fn deliver(
        &self,
        id: &str,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<TaggedResponse<ShipmentStatus>, ResourceError> {
        let delivered_at = delivered_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        self.resource
            .command(
                "deliver",
                vec![json!(id), json!({ "delivered_at": delivered_at })],
            )
            .await
    }

    /// Cancels a shipment.
    ///
    /// # Errors
    ///
    /// Returns the request error or [`ResourceError::UnrecognizedStatus`].
    pub async fn cancel(&self, id: &str) -> Result<TaggedResponse<ShipmentStatus>, ResourceError> {
        self.resource.command("cancel", vec![json!(id)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_fields() {
        assert!(CreateShipment::new("ord_1", "ups").validate().is_ok());
        assert!(matches!(
            CreateShipment::new("ord_1", "").validate(),
            Err(ResourceError::Validation { field: "carrier", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_weight_and_quantity() {
        let mut params = CreateShipment::new("ord_1", "ups");
        params.weight = Some(-2.0);
        assert!(matches!(
            params.validate(),
            Err(ResourceError::Validation { field: "weight", .. })
        ));

        params.weight = Some(f64::NAN);
        assert!(matches!(
            params.validate(),
            Err(ResourceError::Validation { field: "weight", .. })
        ));

        params.weight = Some(2.0);
        params.items.push(ShipmentItem {
            line_item_id: "li_1".to_string(),
            quantity: -1,
        });
        assert!(matches!(
            params.validate(),
            Err(ResourceError::Validation {
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn test_discriminants() {
        assert_eq!(ShipmentStatus::InTransit.discriminant(), "inTransit");
        assert_eq!(
            ShipmentStatus::OutForDelivery.discriminant(),
            "outForDelivery"
        );
        assert_eq!(ShipmentStatus::LabelCreated.discriminant(), "labelCreated");
    }

    #[test]
    fn test_create_params_skip_empty_fields() {
        let body = serde_json::to_value(CreateShipment::new("ord_1", "fedex")).unwrap();
        assert_eq!(body, json!({"order_id": "ord_1", "carrier": "fedex"}));
    }
}

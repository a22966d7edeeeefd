//! Concrete Stateset resources.
//!
//! Each resource wraps a [`Resource`](crate::rest::Resource) method table
//! and follows the same conventions:
//!
//! - create-style calls validate their parameters before dispatch; a
//!   validation failure never reaches the network
//! - reads (`get`, `list`) return the entity as the API sent it, with the
//!   status as a plain string
//! - lifecycle commands (`submit`, `ship`, `cancel`, ...) return a
//!   [`TaggedResponse`](crate::rest::TaggedResponse) whose status is a Rust
//!   enum, and fail on a status the SDK does not know
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::rest::resources::{CreateOrder, OrderLineItem, OrderStatus};
//!
//! let order = client
//!     .orders()
//!     .create(&CreateOrder::new("cus_1", vec![OrderLineItem::new("prod_1", 2)]))
//!     .await?;
//!
//! let submitted = client.orders().submit(&order.id).await?;
//! match submitted.status {
//!     OrderStatus::Submitted => println!("queued for fulfilment"),
//!     OrderStatus::OnHold => println!("needs review"),
//!     other => println!("unexpected: {other:?}"),
//! }
//! ```

mod order;
mod shipment;

pub use order::{CreateOrder, Order, OrderLineItem, OrderStatus, Orders};
pub use shipment::{CreateShipment, Shipment, ShipmentItem, ShipmentStatus, Shipments};

use crate::rest::ResourceError;

fn require_present(
    resource: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ResourceError> {
    if value.trim().is_empty() {
        return Err(ResourceError::Validation {
            resource,
            field,
            reason: "is required".to_string(),
        });
    }
    Ok(())
}

fn require_non_negative<N>(
    resource: &'static str,
    field: &'static str,
    value: N,
) -> Result<(), ResourceError>
where
    N: PartialOrd + Default + std::fmt::Display,
{
    if value < N::default() {
        return Err(ResourceError::Validation {
            resource,
            field,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}

/// Rejects NaN and infinities, which serialize as `null`, then negatives.
fn require_non_negative_amount(
    resource: &'static str,
    field: &'static str,
    value: f64,
) -> Result<(), ResourceError> {
    if !value.is_finite() {
        return Err(ResourceError::Validation {
            resource,
            field,
            reason: format!("must be a finite number, got {value}"),
        });
    }
    require_non_negative(resource, field, value)
}

fn to_body<T: serde::Serialize>(
    context: &'static str,
    value: &T,
) -> Result<serde_json::Value, ResourceError> {
    serde_json::to_value(value).map_err(|e| ResourceError::encode(context, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present_rejects_blank() {
        assert!(require_present("order", "customer_id", "cus_1").is_ok());
        let error = require_present("order", "customer_id", "  ").unwrap_err();
        assert_eq!(error.to_string(), "Invalid order: customer_id is required");
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("order", "quantity", 0_i64).is_ok());
        assert!(require_non_negative("shipment", "weight", 1.5_f64).is_ok());
        let error = require_non_negative("order", "quantity", -1_i64).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid order: quantity must not be negative, got -1"
        );
    }

    #[test]
    fn test_require_non_negative_amount_rejects_non_finite() {
        assert!(require_non_negative_amount("shipment", "weight", 0.0).is_ok());
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let error = require_non_negative_amount("shipment", "weight", value).unwrap_err();
            assert!(error.to_string().contains("must be a finite number"));
        }
        assert!(require_non_negative_amount("order", "unit_price", -0.5).is_err());
    }
}

//! The top-level Stateset client.

use std::sync::Arc;

use crate::clients::{HttpClient, HttpError, Transport};
use crate::config::StatesetConfig;
use crate::rest::resources::{Orders, Shipments};
use crate::rest::{Dispatcher, Resource, ResourceBuilder};

/// Entry point to the Stateset API.
///
/// Owns the configuration and transport; every resource is built once, at
/// construction, and shares them read-only.
///
/// # Example
///
/// ```rust
/// use stateset::{ApiKey, Stateset, StatesetConfig};
///
/// let config = StatesetConfig::builder()
///     .api_key(ApiKey::new("sk_test_123").unwrap())
///     .build()
///     .unwrap();
/// let client = Stateset::new(config).unwrap();
///
/// assert_eq!(client.orders().resource().path(), "orders");
/// ```
#[derive(Clone, Debug)]
pub struct Stateset {
    dispatcher: Dispatcher,
    orders: Orders,
    shipments: Shipments,
}

// Verify Stateset is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Stateset>();
};

impl Stateset {
    /// Creates a client using the bundled reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn new(config: StatesetConfig) -> Result<Self, HttpError> {
        let transport = HttpClient::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(config: StatesetConfig, transport: Arc<dyn Transport>) -> Self {
        let dispatcher = Dispatcher::new(transport, config);
        Self {
            orders: Orders::new(dispatcher.clone()),
            shipments: Shipments::new(dispatcher.clone()),
            dispatcher,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &StatesetConfig {
        self.dispatcher.config()
    }

    /// Returns the shared dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Order operations.
    #[must_use]
    pub const fn orders(&self) -> &Orders {
        &self.orders
    }

    /// Shipment operations.
    #[must_use]
    pub const fn shipments(&self) -> &Shipments {
        &self.shipments
    }

    /// Builds an ad-hoc resource from a method-spec table over this client's
    /// dispatcher.
    ///
    /// `define` receives a builder for `name` rooted at `path` and returns it
    /// with methods added.
    #[must_use]
    pub fn resource(
        &self,
        name: &'static str,
        path: &str,
        define: impl FnOnce(ResourceBuilder) -> ResourceBuilder,
    ) -> Resource {
        define(Resource::builder(name, path)).build(self.dispatcher.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use crate::rest::MethodSpec;
    use crate::HttpMethod;

    fn client() -> Stateset {
        let config = StatesetConfig::builder()
            .api_key(ApiKey::new("sk_test").unwrap())
            .build()
            .unwrap();
        Stateset::new(config).unwrap()
    }

    #[test]
    fn test_resources_share_configuration() {
        let client = client();
        assert_eq!(client.config().base_path(), "/v1");
        assert_eq!(client.orders().resource().name(), "Order");
        assert_eq!(client.shipments().resource().path(), "shipments");
        assert_eq!(
            client.orders().resource().dispatcher().config().base_path(),
            "/v1"
        );
    }

    #[test]
    fn test_ad_hoc_resource() {
        let client = client();
        let warehouses = client.resource("Warehouse", "warehouses", |b| {
            b.standard_methods().method(
                "restock",
                MethodSpec::relative(HttpMethod::Post, "{id}/restock"),
            )
        });

        let prepared = warehouses
            .prepare("restock", vec![serde_json::json!("wh_1")])
            .unwrap();
        assert_eq!(prepared.request().path, "/v1/warehouses/wh_1/restock");
    }
}

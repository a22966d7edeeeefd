//! # Stateset Rust SDK
//!
//! Request dispatch, auto-pagination and typed command responses for the
//! Stateset API.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`StatesetConfig`] and [`StatesetConfigBuilder`]
//! - A pluggable [`Transport`] with a bundled reqwest implementation ([`HttpClient`])
//!   that retries rate-limited and transient failures
//! - A generic dispatch core ([`rest`]): URL templates, option resolution with
//!   deprecated aliases, cursor and offset auto-pagination, and lifecycle
//!   status mapping onto Rust enums
//! - Concrete resources ([`rest::resources`]) built on that core
//!
//! ## Quick Start
//!
//! ```rust
//! use stateset::{ApiKey, Stateset, StatesetConfig};
//!
//! let config = StatesetConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .max_network_retries(2)
//!     .build()
//!     .unwrap();
//!
//! let client = Stateset::new(config).unwrap();
//! ```
//!
//! ## Making Calls
//!
//! ```rust,ignore
//! use stateset::rest::resources::{CreateShipment, ShipmentStatus};
//! use serde_json::json;
//!
//! // Validated before anything is sent
//! let shipment = client
//!     .shipments()
//!     .create(&CreateShipment::new("ord_1", "ups"))
//!     .await?;
//!
//! // Lifecycle commands return a status you can match on
//! let shipped = client.shipments().ship(&shipment.id, "1Z999").await?;
//! if shipped.is(ShipmentStatus::InTransit) {
//!     println!("on its way");
//! }
//!
//! // Walk every page, stopping early
//! client
//!     .shipments()
//!     .list(json!({"carrier": "ups"}))?
//!     .for_each(|s| async move { s.status != "EXCEPTION" })
//!     .await?;
//! ```
//!
//! ## Errors
//!
//! Failed requests surface as [`rest::ResourceError::Request`], with the
//! transport error nested under `details.original_error`:
//!
//! ```rust,ignore
//! if let Err(err) = client.orders().get("ord_missing").await {
//!     assert_eq!(err.details().unwrap().original_error.status(), Some(404));
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: newtypes, method specs and create parameters
//!   validate before any network call
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

pub use client::Stateset;
pub use config::{ApiKey, HostUrl, StatesetConfig, StatesetConfigBuilder};
pub use error::ConfigError;

// Re-export transport types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, Transport,
};

// Re-export the dispatch core's main types
pub use rest::{AutoPager, Dispatcher, MethodSpec, Resource, ResourceError, TaggedResponse};

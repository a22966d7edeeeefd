//! The request dispatch core shared by every Stateset resource.
//!
//! A resource call flows through these pieces in order:
//!
//! 1. **[`MethodSpec`]**: the operation's HTTP verb and path template
//! 2. **Option resolution** ([`CallArgs`], [`resolve_options`]): positional
//!    arguments are split into URL parameters, data and [`CallOptions`]
//! 3. **URL templating** ([`extract_params`], [`fill`]): placeholders are
//!    replaced by percent-encoded values
//! 4. **[`Dispatcher`]**: the assembled request goes through the injected
//!    [`Transport`](crate::clients::Transport)
//! 5. **[`AutoPager`]** for list and search operations, and
//!    **[`map_to_tagged`]** for lifecycle commands
//!
//! [`Resource`] bundles a method-spec table with a dispatcher, and
//! [`resources`] holds the concrete Stateset resources built on it.
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::rest::{MethodSpec, MethodType, Resource};
//! use stateset::HttpMethod;
//! use serde_json::json;
//!
//! let returns = Resource::builder("Return", "returns")
//!     .standard_methods()
//!     .method("approve", MethodSpec::relative(HttpMethod::Post, "{id}/approve"))
//!     .build(client.dispatcher().clone());
//!
//! let pending = returns
//!     .paginate::<serde_json::Value>("list", vec![json!({"status": "REQUESTED"})])?
//!     .to_array(25)
//!     .await?;
//! ```

mod dispatch;
mod errors;
mod method;
mod options;
mod pagination;
mod path;
mod resource;
mod status;

pub mod resources;

pub use dispatch::{Dispatcher, PreparedRequest};
pub use errors::{ErrorDetails, ResourceError};
pub use method::{MethodSpec, MethodSpecBuilder, MethodType, PageShape, PathSpec};
pub use options::{
    resolve_options, CallArgs, CallOptions, RequestSettings, ACCOUNT_HEADER,
    DEPRECATED_OPTIONS, IDEMPOTENCY_KEY_HEADER, RECOGNIZED_OPTIONS, VERSION_HEADER,
};
pub use pagination::{parse_page, AutoPager, Continuation, CursorPage, OffsetPage, Page};
pub use path::{encode_component, escape_template, extract_params, fill, unique_params};
pub use resource::{Resource, ResourceBuilder};
pub use status::{lower_camel, map_to_tagged, ResourceStatus, TaggedResponse};

//! Error types for the dispatch core.
//!
//! [`ResourceError`] covers the whole taxonomy of a resource call:
//!
//! - **Construction**: [`ResourceError::InvalidMethodSpec`],
//!   [`ResourceError::OptionConflict`], [`ResourceError::UnknownMethod`]
//! - **Validation** (before any network call): [`ResourceError::Validation`],
//!   [`ResourceError::MissingUrlParam`], [`ResourceError::InvalidUrlParam`]
//! - **Transport/HTTP**: [`ResourceError::Request`], which nests the
//!   untouched transport error under [`ErrorDetails::original_error`]
//! - **Payload shaping**: [`ResourceError::UnrecognizedStatus`],
//!   [`ResourceError::Deserialize`], [`ResourceError::Encode`]
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::rest::ResourceError;
//!
//! match client.orders().get("ord_123").await {
//!     Ok(order) => println!("{}", order.id),
//!     Err(err) if err.status() == Some(404) => println!("no such order"),
//!     Err(ResourceError::Validation { field, reason, .. }) => println!("{field}: {reason}"),
//!     Err(err) => println!("other error: {err}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, HttpMethod};

/// Root-cause information attached to a failed request.
#[derive(Debug)]
pub struct ErrorDetails {
    /// The transport error exactly as the transport returned it.
    pub original_error: HttpError,
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.original_error, f)
    }
}

/// Error type for resource calls.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A method spec sets both or neither of `path` and `full_path`.
    #[error("Invalid method spec: {reason}")]
    InvalidMethodSpec {
        /// Why the spec was rejected.
        reason: &'static str,
    },

    /// An options object contains both a deprecated key and its replacement.
    #[error("Both '{canonical}' and '{deprecated}' were provided; '{deprecated}' is deprecated, use only '{canonical}'")]
    OptionConflict {
        /// The deprecated key name.
        deprecated: &'static str,
        /// The canonical key name.
        canonical: &'static str,
    },

    /// A path placeholder had no positional argument to fill it.
    #[error("Missing value for URL parameter '{param}'")]
    MissingUrlParam {
        /// The placeholder name.
        param: String,
    },

    /// A positional argument for a path placeholder was not a string or number.
    #[error("URL parameter '{param}' must be a string or number, got: {value}")]
    InvalidUrlParam {
        /// The placeholder name.
        param: String,
        /// The offending value.
        value: serde_json::Value,
    },

    /// A resource has no method with the given name.
    #[error("{resource} has no method named '{method}'")]
    UnknownMethod {
        /// The resource name.
        resource: String,
        /// The requested method name.
        method: String,
    },

    /// Auto-pagination was requested for a method that is not a list or search.
    #[error("Method {method} {path} is not a list or search method and cannot be paginated")]
    NotPaginated {
        /// The HTTP method of the spec.
        method: HttpMethod,
        /// The path template of the spec.
        path: String,
    },

    /// A per-resource presence or range check failed.
    #[error("Invalid {resource}: {field} {reason}")]
    Validation {
        /// The resource being validated.
        resource: &'static str,
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The backend returned a status outside the resource's enumeration.
    #[error("Unrecognized {resource} status '{status}'")]
    UnrecognizedStatus {
        /// The resource kind.
        resource: &'static str,
        /// The raw status value.
        status: String,
    },

    /// A response payload could not be decoded into the expected type.
    #[error("Failed to decode {context}: {source}")]
    Deserialize {
        /// What was being decoded.
        context: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Request parameters could not be encoded as JSON.
    #[error("Failed to encode {context}: {source}")]
    Encode {
        /// What was being encoded.
        context: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The transport failed or the API returned a non-2xx response.
    #[error("{method} {path} failed: {details}")]
    Request {
        /// The HTTP method of the failed request.
        method: HttpMethod,
        /// The request path.
        path: String,
        /// The nested transport error.
        details: ErrorDetails,
    },
}

impl ResourceError {
    /// Wraps a transport error for the given request.
    #[must_use]
    pub fn request(method: HttpMethod, path: impl Into<String>, error: HttpError) -> Self {
        Self::Request {
            method,
            path: path.into(),
            details: ErrorDetails {
                original_error: error,
            },
        }
    }

    /// Wraps a serde error with context.
    #[must_use]
    pub fn deserialize(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Deserialize {
            context: context.into(),
            source,
        }
    }

    /// Wraps a serde error raised while encoding request parameters.
    #[must_use]
    pub fn encode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            context: context.into(),
            source,
        }
    }

    /// Returns the nested transport details, if this is a request failure.
    #[must_use]
    pub const fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Request { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed request, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.details().and_then(|d| d.original_error.status())
    }

    /// Returns the request ID of the failed request, if known.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.details().and_then(|d| d.original_error.request_id())
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};

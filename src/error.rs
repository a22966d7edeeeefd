//! Error types for SDK configuration.
//!
//! Configuration constructors return `Result<T, ConfigError>` so invalid
//! credentials or hosts are rejected before any client is built.
//!
//! # Example
//!
//! ```rust
//! use stateset::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Stateset API key.")]
    EmptyApiKey,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.stateset.io').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Base path is invalid.
    #[error("Invalid base path '{path}'. The base path must start with '/'.")]
    InvalidBasePath {
        /// The invalid path that was provided.
        path: String,
    },
}

//! Configuration types for the Stateset SDK.
//!
//! - [`StatesetConfig`]: immutable client configuration
//! - [`StatesetConfigBuilder`]: builder for [`StatesetConfig`]
//! - [`ApiKey`]: a validated bearer credential with masked debug output
//! - [`HostUrl`]: a validated API host URL
//!
//! # Example
//!
//! ```rust
//! use stateset::{StatesetConfig, ApiKey};
//!
//! let config = StatesetConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .max_network_retries(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.host().as_ref(), "https://api.stateset.io");
//! assert_eq!(config.base_path(), "/v1");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, HostUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default API host.
pub const DEFAULT_HOST: &str = "https://api.stateset.io";

/// Default path prefix prepended to relative method paths.
pub const DEFAULT_BASE_PATH: &str = "/v1";

/// Configuration for the Stateset SDK.
///
/// This is the only process-wide state the SDK uses. It is owned by the
/// top-level [`Stateset`](crate::Stateset) client and shared read-only with
/// every resource.
#[derive(Clone, Debug)]
pub struct StatesetConfig {
    api_key: ApiKey,
    host: HostUrl,
    base_path: String,
    api_version: Option<String>,
    max_network_retries: u32,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl StatesetConfig {
    /// Creates a new builder for constructing a `StatesetConfig`.
    #[must_use]
    pub fn builder() -> StatesetConfigBuilder {
        StatesetConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API host.
    #[must_use]
    pub const fn host(&self) -> &HostUrl {
        &self.host
    }

    /// Returns the base path prepended to relative method paths.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default API version header value, if configured.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Returns the default number of network retries.
    #[must_use]
    pub const fn max_network_retries(&self) -> u32 {
        self.max_network_retries
    }

    /// Returns the default request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify StatesetConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StatesetConfig>();
};

/// Builder for constructing [`StatesetConfig`] instances.
///
/// `api_key` is required. Everything else has a default:
///
/// - `host`: [`DEFAULT_HOST`]
/// - `base_path`: [`DEFAULT_BASE_PATH`]
/// - `api_version`: `None`
/// - `max_network_retries`: `0`
/// - `timeout`: `None`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct StatesetConfigBuilder {
    api_key: Option<ApiKey>,
    host: Option<HostUrl>,
    base_path: Option<String>,
    api_version: Option<String>,
    max_network_retries: Option<u32>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl StatesetConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API host.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the base path prepended to relative method paths.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Sets the default `Stateset-Version` header value.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the default number of network retries for every request.
    #[must_use]
    pub const fn max_network_retries(mut self, retries: u32) -> Self {
        self.max_network_retries = Some(retries);
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`StatesetConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set,
    /// or [`ConfigError::InvalidBasePath`] if the base path does not start with `/`.
    pub fn build(self) -> Result<StatesetConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        let host = match self.host {
            Some(host) => host,
            None => HostUrl::new(DEFAULT_HOST)?,
        };

        let base_path = self
            .base_path
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(ConfigError::InvalidBasePath { path: base_path });
        }

        Ok(StatesetConfig {
            api_key,
            host,
            base_path: base_path.trim_end_matches('/').to_string(),
            api_version: self.api_version,
            max_network_retries: self.max_network_retries.unwrap_or(0),
            timeout: self.timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let result = StatesetConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = StatesetConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.host().as_ref(), DEFAULT_HOST);
        assert_eq!(config.base_path(), "/v1");
        assert!(config.api_version().is_none());
        assert_eq!(config.max_network_retries(), 0);
        assert!(config.timeout().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = StatesetConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .host(HostUrl::new("http://localhost:4000").unwrap())
            .base_path("/api/v2/")
            .api_version("2024-01-01")
            .max_network_retries(3)
            .timeout(Duration::from_secs(10))
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.host().as_ref(), "http://localhost:4000");
        assert_eq!(config.base_path(), "/api/v2");
        assert_eq!(config.api_version(), Some("2024-01-01"));
        assert_eq!(config.max_network_retries(), 3);
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_builder_rejects_relative_base_path() {
        let result = StatesetConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .base_path("v1")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_config_debug_does_not_leak_key() {
        let config = StatesetConfig::builder()
            .api_key(ApiKey::new("sk_live_secret").unwrap())
            .build()
            .unwrap();
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("StatesetConfig"));
        assert!(!debug_str.contains("sk_live_secret"));
    }
}

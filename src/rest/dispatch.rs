//! Request dispatcher.
//!
//! The [`Dispatcher`] turns a [`MethodSpec`] plus positional call arguments
//! into an [`HttpRequest`] and hands it to the injected [`Transport`]. It
//! holds no transport logic itself: retries and timeouts are forwarded on
//! the request and enforced by the transport.
//!
//! Dispatch is split in two steps:
//!
//! - [`Dispatcher::prepare`] is pure: it fills the path template, resolves
//!   options and encodes data, failing before any network call
//! - [`Dispatcher::send`] performs the I/O
//!
//! # Example
//!
//! ```rust
//! use stateset::rest::{Dispatcher, MethodSpec};
//! use stateset::{ApiKey, HttpClient, HttpMethod, StatesetConfig};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let config = StatesetConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .build()
//!     .unwrap();
//! let dispatcher = Dispatcher::new(Arc::new(HttpClient::new(&config).unwrap()), config);
//!
//! let spec = MethodSpec::relative(HttpMethod::Get, "{id}/items/{itemId}");
//! let prepared = dispatcher
//!     .prepare("orders", &spec, vec![json!("A 1"), json!("B")])
//!     .unwrap();
//! assert_eq!(prepared.request().path, "/v1/orders/A%201/items/B");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponseError, Transport};
use crate::config::StatesetConfig;
use crate::rest::options::{IDEMPOTENCY_KEY_HEADER, VERSION_HEADER};
use crate::rest::{fill, unique_params, AutoPager, CallArgs, MethodSpec, ResourceError};

/// Length of generated idempotency keys.
const IDEMPOTENCY_KEY_LENGTH: usize = 32;

/// A fully-assembled request together with the spec that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    spec: MethodSpec,
    request: HttpRequest,
    generated_idempotency_key: bool,
}

impl PreparedRequest {
    /// Returns the spec this request was prepared from.
    #[must_use]
    pub const fn spec(&self) -> &MethodSpec {
        &self.spec
    }

    /// Returns the assembled request.
    #[must_use]
    pub const fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Returns `true` if the idempotency key was generated rather than
    /// supplied by the caller.
    #[must_use]
    pub const fn has_generated_idempotency_key(&self) -> bool {
        self.generated_idempotency_key
    }

    /// Consumes the prepared request, returning the inner [`HttpRequest`].
    #[must_use]
    pub fn into_request(self) -> HttpRequest {
        self.request
    }
}

/// Dispatches resource calls through an injected [`Transport`].
///
/// Cloning is cheap; clones share the transport and configuration.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    config: Arc<StatesetConfig>,
}

// Verify Dispatcher is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dispatcher>();
};

pub(crate) fn generate_idempotency_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(IDEMPOTENCY_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Encodes request data as query parameters. Scalars are stringified,
/// nested values are sent as JSON, nulls are dropped.
fn encode_query(data: Map<String, Value>) -> BTreeMap<String, String> {
    data.into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
            };
            Some((key, value))
        })
        .collect()
}

impl Dispatcher {
    /// Creates a dispatcher over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: StatesetConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &StatesetConfig {
        &self.config
    }

    /// Assembles the request for `spec` without sending it.
    ///
    /// `args` are consumed as described in [`CallArgs::split`]. Retries and
    /// timeout fall back to the client configuration when the call does not
    /// set them, as does the `Stateset-Version` header. A POST that may be
    /// retried gets a generated idempotency key unless one was supplied.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MissingUrlParam`] / [`ResourceError::InvalidUrlParam`]
    ///   if a path placeholder cannot be filled
    /// - [`ResourceError::OptionConflict`] if the options object mixes a
    ///   deprecated key with its replacement
    pub fn prepare(
        &self,
        resource_path: &str,
        spec: &MethodSpec,
        args: Vec<Value>,
    ) -> Result<PreparedRequest, ResourceError> {
        let template = spec.template(self.config.base_path(), resource_path);
        let call = CallArgs::split(args, &unique_params(&template))?;

        let values: HashMap<&str, &str> = call
            .url_params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        let path = fill(&template, &values);

        let method = spec.http_method();
        let options = call.options;

        let retries = match options.settings.max_network_retries {
            0 => self.config.max_network_retries(),
            n => n,
        };
        let timeout = match options.settings.timeout {
            0 => self.config.timeout(),
            ms => Some(Duration::from_millis(ms)),
        };

        let mut builder = HttpRequest::builder(method, path.clone()).max_network_retries(retries);

        if method.has_body() {
            builder = builder.body(Value::Object(call.data.unwrap_or_default()));
        } else if let Some(data) = call.data {
            builder = builder.query(encode_query(data));
        }

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(auth) = &options.auth {
            builder = builder.auth(auth);
        }
        if let Some(host) = &options.host {
            builder = builder.host(host);
        }

        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        if options.header(VERSION_HEADER).is_none() {
            if let Some(version) = self.config.api_version() {
                builder = builder.header(VERSION_HEADER, version);
            }
        }
        let generated_idempotency_key = method == HttpMethod::Post
            && retries > 0
            && options.header(IDEMPOTENCY_KEY_HEADER).is_none();
        if generated_idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY_HEADER, generate_idempotency_key());
        }

        let request = builder
            .build()
            .map_err(|e| ResourceError::request(method, path, HttpError::InvalidRequest(e)))?;

        Ok(PreparedRequest {
            spec: spec.clone(),
            request,
            generated_idempotency_key,
        })
    }

    /// Sends an assembled request and returns the decoded payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Request`] carrying the transport error under
    /// `details.original_error`. A response outside 2xx is always an error,
    /// even from a transport that returned it as `Ok`.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<Value, ResourceError> {
        let method = request.http_method;
        let path = request.path.clone();

        tracing::debug!("Dispatching {} {}", method, path);

        let response = self
            .transport
            .request(request)
            .await
            .map_err(|e| ResourceError::request(method, path.clone(), e))?;

        if !response.is_ok() {
            let request_id = response.request_id().map(String::from);
            let error = HttpResponseError::from_body(response.code, response.body, request_id);
            return Err(ResourceError::request(
                method,
                path,
                HttpError::Response(error),
            ));
        }

        Ok(response.body)
    }

    /// Sends a prepared request.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn send(&self, prepared: &PreparedRequest) -> Result<Value, ResourceError> {
        self.dispatch(prepared.request.clone()).await
    }

    /// Prepares and sends a call in one step.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare) and [`dispatch`](Self::dispatch).
    pub async fn request(
        &self,
        resource_path: &str,
        spec: &MethodSpec,
        args: Vec<Value>,
    ) -> Result<Value, ResourceError> {
        let prepared = self.prepare(resource_path, spec, args)?;
        self.send(&prepared).await
    }

    /// Prepares a list or search call for auto-pagination.
    ///
    /// No request is sent until the returned pager is walked.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotPaginated`] if `spec` has no method type,
    /// or any error from [`prepare`](Self::prepare).
    pub fn paginate<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        spec: &MethodSpec,
        args: Vec<Value>,
    ) -> Result<AutoPager<T>, ResourceError> {
        if !spec.is_paginated() {
            return Err(ResourceError::NotPaginated {
                method: spec.http_method(),
                path: spec.template(self.config.base_path(), resource_path),
            });
        }

        let prepared = self.prepare(resource_path, spec, args)?;
        Ok(AutoPager::new(self.clone(), prepared))
    }
}

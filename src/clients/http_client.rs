//! reqwest-backed [`Transport`] implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::StatesetConfig;

/// Fixed retry wait time in seconds when the server gives no `Retry-After`.
pub const RETRY_WAIT_TIME: u64 = 1;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Status codes that are retried when `max_network_retries > 0`.
const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

/// HTTP transport for the Stateset API.
///
/// The client handles:
/// - URL construction from the configured host or a per-request host override
/// - Default headers including User-Agent and the bearer token
/// - Retry logic for 429 and 5xx responses and connection failures
/// - Per-request timeouts
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; one instance is shared by every resource.
///
/// # Example
///
/// ```rust
/// use stateset::{ApiKey, StatesetConfig};
/// use stateset::clients::HttpClient;
///
/// let config = StatesetConfig::builder()
///     .api_key(ApiKey::new("sk_test_123").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config).unwrap();
/// assert_eq!(client.base_uri(), "https://api.stateset.io");
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_uri: String,
    default_headers: HashMap<String, String>,
    default_timeout: Option<Duration>,
    retry_wait: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the SDK configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: &StatesetConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Stateset Rust SDK v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Authorization".to_string(), config.api_key().bearer());

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_uri: config.host().as_ref().to_string(),
            default_headers,
            default_timeout: config.timeout(),
            retry_wait: Duration::from_secs(RETRY_WAIT_TIME),
        })
    }

    /// Overrides the fixed delay between retries.
    #[must_use]
    pub const fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = wait;
        self
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    fn build_headers(&self, request: &HttpRequest) -> HashMap<String, String> {
        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(token) = &request.auth {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        for (key, value) in &request.extra_headers {
            // Unset option headers travel as empty strings
            if !value.is_empty() {
                headers.insert(key.clone(), value.clone());
            }
        }
        headers
    }

    fn build_url(&self, request: &HttpRequest) -> String {
        let base = request
            .host
            .as_deref()
            .map_or(self.base_uri.as_str(), |h| h.trim_end_matches('/'));
        format!("{base}{}", request.path)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(&self, response: Option<&HttpResponse>) -> Duration {
        if let Some(response) = response {
            if response.code == 429 {
                if let Some(retry_after) = response.retry_request_after {
                    return Duration::try_from_secs_f64(retry_after.max(0.0))
                        .unwrap_or(self.retry_wait);
                }
            }
        }
        self.retry_wait
    }

    async fn send_once(
        &self,
        request: &HttpRequest,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, reqwest::Error> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Patch => self.client.patch(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        if let Some(timeout) = request.timeout.or(self.default_timeout) {
            req_builder = req_builder.timeout(timeout);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
        };

        Ok(HttpResponse::new(code, res_headers, body))
    }
}

#[async_trait]
impl Transport for HttpClient {
    /// Sends an HTTP request, retrying retryable failures up to
    /// `request.max_network_retries` additional times.
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.build_url(&request);
        let headers = self.build_headers(&request);
        let max_tries = request.max_network_retries.saturating_add(1);

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let response = match self.send_once(&request, &url, &headers).await {
                Ok(response) => response,
                Err(err) => {
                    let retryable = err.is_connect() || err.is_timeout();
                    if !retryable || request.max_network_retries == 0 {
                        return Err(HttpError::Network(err));
                    }
                    if tries >= max_tries {
                        return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                            code: None,
                            tries,
                            message: err.to_string(),
                            request_id: None,
                        }));
                    }
                    let delay = self.calculate_retry_delay(None);
                    tracing::debug!(
                        "Retrying {} {} after network error (attempt {}/{}, waiting {:?})",
                        request.http_method,
                        request.path,
                        tries,
                        max_tries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            if let Some(reason) = response.deprecation_reason() {
                tracing::warn!(
                    "Deprecated request to Stateset API at {}, received reason: {}",
                    request.path,
                    reason
                );
            }

            if response.is_ok() {
                return Ok(response);
            }

            let code = response.code;
            let request_id = response.request_id().map(String::from);
            let should_retry = RETRYABLE_STATUS.contains(&code) && request.max_network_retries > 0;

            if !should_retry {
                return Err(HttpError::Response(HttpResponseError::from_body(
                    code,
                    response.body,
                    request_id,
                )));
            }

            if tries >= max_tries {
                let last = HttpResponseError::from_body(code, response.body, request_id);
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code: Some(code),
                    tries,
                    message: last.message,
                    request_id: last.request_id,
                }));
            }

            let delay = self.calculate_retry_delay(Some(&response));
            tracing::debug!(
                "Retrying {} {} after status {} (attempt {}/{}, waiting {:?})",
                request.http_method,
                request.path,
                code,
                tries,
                max_tries,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, HostUrl};

    fn create_test_config() -> StatesetConfig {
        StatesetConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction_uses_config_host() {
        let config = StatesetConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .host(HostUrl::new("http://localhost:9000").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_uri(), "http://localhost:9000");
    }

    #[test]
    fn test_authorization_header_is_bearer() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Bearer sk_test_123".to_string())
        );
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = StatesetConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("Stateset Rust SDK v"));
    }

    #[test]
    fn test_build_headers_applies_auth_override_and_skips_empty_values() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, "/v1/orders")
            .auth("sk_other")
            .header("Idempotency-Key", "")
            .header("Stateset-Account", "acct_1")
            .build()
            .unwrap();

        let headers = client.build_headers(&request);
        assert_eq!(
            headers.get("Authorization"),
            Some(&"Bearer sk_other".to_string())
        );
        assert!(!headers.contains_key("Idempotency-Key"));
        assert_eq!(headers.get("Stateset-Account"), Some(&"acct_1".to_string()));
    }

    #[test]
    fn test_build_url_honours_host_override() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        let request = HttpRequest::builder(HttpMethod::Get, "/v1/orders")
            .build()
            .unwrap();
        assert_eq!(
            client.build_url(&request),
            "https://api.stateset.io/v1/orders"
        );

        let request = HttpRequest::builder(HttpMethod::Get, "/v1/orders")
            .host("http://127.0.0.1:1234/")
            .build()
            .unwrap();
        assert_eq!(client.build_url(&request), "http://127.0.0.1:1234/v1/orders");
    }

    #[test]
    fn test_retry_delay_uses_retry_after_for_429_only() {
        let client = HttpClient::new(&create_test_config())
            .unwrap()
            .with_retry_wait(Duration::from_millis(10));

        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["2".to_string()]);

        let limited = HttpResponse::new(429, headers.clone(), serde_json::json!({}));
        assert_eq!(
            client.calculate_retry_delay(Some(&limited)),
            Duration::from_secs(2)
        );

        let server_error = HttpResponse::new(500, headers, serde_json::json!({}));
        assert_eq!(
            client.calculate_retry_delay(Some(&server_error)),
            Duration::from_millis(10)
        );
        assert_eq!(client.calculate_retry_delay(None), Duration::from_millis(10));
    }

    #[test]
    fn test_unrepresentable_retry_after_falls_back_to_fixed_wait() {
        let client = HttpClient::new(&create_test_config())
            .unwrap()
            .with_retry_wait(Duration::from_millis(10));

        for value in ["inf", "1e400"] {
            let mut headers = HashMap::new();
            headers.insert("retry-after".to_string(), vec![value.to_string()]);
            let limited = HttpResponse::new(429, headers, serde_json::json!({}));
            assert_eq!(
                client.calculate_retry_delay(Some(&limited)),
                Duration::from_millis(10),
                "{value}"
            );
        }
    }
}

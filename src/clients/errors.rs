//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the API
//! - [`MaxHttpRetriesExceededError`]: When retry attempts are exhausted
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::clients::HttpError;
//!
//! match transport.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("Retries exhausted after {} tries", e.tries),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use stateset::clients::HttpResponseError;
/// use serde_json::json;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "not found".to_string(),
///     body: json!({"error": {"message": "not found"}}),
///     request_id: Some("req_123".to_string()),
/// };
///
/// assert_eq!(error.to_string(), "not found");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable error message extracted from the response body.
    pub message: String,
    /// The decoded response body.
    pub body: serde_json::Value,
    /// Request ID from the `Request-Id`/`X-Request-Id` header.
    pub request_id: Option<String>,
}

impl HttpResponseError {
    /// Builds an error from a status code and decoded body.
    ///
    /// The message is taken from the first of `error.message`, `error`
    /// (when a string), `message`, or `errors` (joined) that is present.
    #[must_use]
    pub fn from_body(code: u16, body: serde_json::Value, request_id: Option<String>) -> Self {
        let message = extract_message(&body)
            .unwrap_or_else(|| format!("Request failed with status code {code}"));
        Self {
            code,
            message,
            body,
            request_id,
        }
    }
}

fn extract_message(body: &serde_json::Value) -> Option<String> {
    if let Some(message) = body.pointer("/error/message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }
    if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }
    if let Some(message) = body.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }
    body.get("errors").and_then(|errors| match errors {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(arr) => {
            let msgs: Vec<&str> = arr.iter().filter_map(|v| v.as_str()).collect();
            (!msgs.is_empty()).then(|| msgs.join(", "))
        }
        _ => None,
    })
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response, if one was received.
    pub code: Option<u16>,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Message from the last failed attempt.
    pub message: String,
    /// Request ID of the last response.
    pub request_id: Option<String>,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path is not absolute.
    #[error("Request path '{path}' must start with '/'.")]
    RelativePath {
        /// The offending path.
        path: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => e.code,
            Self::InvalidRequest(_) => None,
            Self::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Returns the request ID of the failed response, if known.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Response(e) => e.request_id.as_deref(),
            Self::MaxRetries(e) => e.request_id.as_deref(),
            _ => None,
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_body_prefers_nested_error_message() {
        let error = HttpResponseError::from_body(
            400,
            json!({"error": {"message": "Missing order id", "type": "invalid_request"}}),
            None,
        );
        assert_eq!(error.to_string(), "Missing order id");
        assert_eq!(error.code, 400);
    }

    #[test]
    fn test_from_body_falls_back_through_known_shapes() {
        let error = HttpResponseError::from_body(404, json!({"error": "not found"}), None);
        assert_eq!(error.message, "not found");

        let error = HttpResponseError::from_body(500, json!({"message": "boom"}), None);
        assert_eq!(error.message, "boom");

        let error = HttpResponseError::from_body(422, json!({"errors": ["a", "b"]}), None);
        assert_eq!(error.message, "a, b");

        let error = HttpResponseError::from_body(502, json!({}), None);
        assert_eq!(error.message, "Request failed with status code 502");
    }

    #[test]
    fn test_max_retries_error_includes_retry_count() {
        let error = MaxHttpRetriesExceededError {
            code: Some(429),
            tries: 3,
            message: "Rate limited".to_string(),
            request_id: None,
        };
        let message = error.to_string();
        assert!(message.contains('3'));
        assert!(message.contains("Exceeded maximum retry count"));
    }

    #[test]
    fn test_invalid_request_error_messages() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use post without specifying data.");
        assert_eq!(
            InvalidHttpRequestError::MissingBodyType.to_string(),
            "Cannot set a body without also setting body_type."
        );
    }

    #[test]
    fn test_http_error_status_and_request_id() {
        let error = HttpError::Response(HttpResponseError::from_body(
            404,
            json!({"error": "not found"}),
            Some("req_1".to_string()),
        ));
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.request_id(), Some("req_1"));

        let error = HttpError::InvalidRequest(InvalidHttpRequestError::MissingBodyType);
        assert_eq!(error.status(), None);
        assert_eq!(error.request_id(), None);
    }
}

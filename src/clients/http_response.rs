//! HTTP response types.

use std::collections::HashMap;

/// A decoded response returned by a [`Transport`](crate::clients::Transport).
///
/// Header names are stored lowercased; each name maps to every value
/// received for it.
///
/// # Example
///
/// ```rust
/// use stateset::clients::HttpResponse;
/// use std::collections::HashMap;
/// use serde_json::json;
///
/// let mut headers = HashMap::new();
/// headers.insert("request-id".to_string(), vec!["req_123".to_string()]);
///
/// let response = HttpResponse::new(200, headers, json!({"id": "ord_1"}));
/// assert!(response.is_ok());
/// assert_eq!(response.request_id(), Some("req_123"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (lowercased names).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded JSON body (`{}` when the body was empty).
    pub body: serde_json::Value,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new response, parsing `Retry-After` from the headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of the named header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the request ID from `Request-Id` or `X-Request-Id`.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("request-id")
            .or_else(|| self.header("x-request-id"))
    }

    /// Returns the `Stateset-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("stateset-deprecated-reason")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in [200, 201, 204, 299] {
            assert!(HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [199, 300, 404, 429, 500] {
            assert!(!HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = HttpResponse::new(429, headers(&[("retry-after", "2.5")]), json!({}));
        assert_eq!(response.retry_request_after, Some(2.5));

        let response = HttpResponse::new(429, headers(&[("retry-after", "soon")]), json!({}));
        assert_eq!(response.retry_request_after, None);
    }

    #[test]
    fn test_request_id_extraction() {
        let response = HttpResponse::new(200, headers(&[("x-request-id", "abc")]), json!({}));
        assert_eq!(response.request_id(), Some("abc"));

        let response = HttpResponse::new(200, headers(&[("request-id", "def")]), json!({}));
        assert_eq!(response.request_id(), Some("def"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(
            200,
            headers(&[("stateset-deprecated-reason", "use /v2")]),
            json!({}),
        );
        assert_eq!(response.header("Stateset-Deprecated-Reason"), Some("use /v2"));
        assert_eq!(response.deprecation_reason(), Some("use /v2"));
    }
}

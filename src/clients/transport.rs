//! The transport capability injected into the dispatch layer.

use async_trait::async_trait;

use crate::clients::{HttpError, HttpRequest, HttpResponse};

/// Sends a fully-assembled [`HttpRequest`] and returns the decoded response.
///
/// This is the only outbound capability the dispatch core depends on. The
/// bundled [`HttpClient`](crate::clients::HttpClient) implements it with
/// reqwest; tests and alternative runtimes can plug in their own.
///
/// Implementations return `Err(HttpError::Response(..))` for non-2xx
/// responses. Retry enforcement (`HttpRequest::max_network_retries`) is the
/// transport's responsibility; a transport that does not retry must document
/// that it ignores the field.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use stateset::clients::{HttpError, HttpRequest, HttpResponse, Transport};
/// use std::collections::HashMap;
///
/// #[derive(Debug)]
/// struct Echo;
///
/// #[async_trait]
/// impl Transport for Echo {
///     async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(
///             200,
///             HashMap::new(),
///             serde_json::json!({ "path": request.path }),
///         ))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

//! Transport layer for Stateset API communication.
//!
//! The dispatch core in [`rest`](crate::rest) assembles requests; this module
//! sends them.
//!
//! - [`Transport`]: the injected capability (`request(HttpRequest) -> HttpResponse`)
//! - [`HttpClient`]: the bundled reqwest implementation of [`Transport`]
//! - [`HttpRequest`] / [`HttpResponse`]: request and response values
//! - [`HttpError`]: unified transport error
//!
//! # Retry Behavior
//!
//! [`HttpClient`] retries when `HttpRequest::max_network_retries > 0`:
//!
//! - **429**: waits for `Retry-After`, or 1 second if not present
//! - **500, 502, 503, 504** and connection failures: fixed 1-second delay
//! - **Other 4xx**: returns immediately without retry
//!
//! The default is 0 retries.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::Transport;

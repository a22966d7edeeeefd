//! Auto-pagination for list and search operations.
//!
//! List endpoints return one of two page shapes:
//!
//! - cursor pages: `{"data": [...], "has_more": true}`, continued by an
//!   explicit cursor, the last item's `id`, or failing both the next page
//!   number
//! - offset pages: `{"items": [...], "total": 40, "limit": 10, "offset": 0}`
//!
//! Both are decoded into a [`Page`], which yields its items and the
//! [`Continuation`] needed to request the next page. [`AutoPager`] walks
//! pages strictly in sequence and never branches on the shape itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::rest::AutoPager;
//!
//! let pager: AutoPager<serde_json::Value> = client.orders().list(json!({"limit": 50}))?;
//!
//! // At most 120 orders, across as many pages as needed
//! let orders = pager.to_array(120).await?;
//!
//! // Stop as soon as a cancelled order shows up
//! pager
//!     .for_each(|order| async move { order["status"] != "CANCELLED" })
//!     .await?;
//! ```

use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::clients::HttpRequest;
use crate::rest::dispatch::generate_idempotency_key;
use crate::rest::options::IDEMPOTENCY_KEY_HEADER;
use crate::rest::{Dispatcher, PageShape, PreparedRequest, ResourceError};

/// State needed to fetch the page after the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Send `cursor` under the request parameter `param`.
    Cursor {
        /// Request parameter name.
        param: &'static str,
        /// Opaque cursor value.
        cursor: String,
    },
    /// Request `limit` items starting at `offset`.
    Offset {
        /// Index of the first item of the next page.
        offset: u64,
        /// Page size.
        limit: u64,
    },
    /// Request page number `page`.
    Page {
        /// One-based page number.
        page: u64,
    },
}

impl Continuation {
    /// Writes the continuation into a request: into the JSON body for
    /// methods that carry one, into the query string otherwise.
    pub fn apply(&self, request: &mut HttpRequest) {
        let params: Vec<(&str, Value)> = match self {
            Self::Cursor { param, cursor } => vec![(*param, Value::from(cursor.as_str()))],
            Self::Offset { offset, limit } => {
                vec![("offset", Value::from(*offset)), ("limit", Value::from(*limit))]
            }
            Self::Page { page } => vec![("page", Value::from(*page))],
        };

        match request.body.as_mut() {
            Some(Value::Object(body)) if request.http_method.has_body() => {
                for (key, value) in params {
                    body.insert(key.to_string(), value);
                }
            }
            _ => {
                for (key, value) in params {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    request.query.insert(key.to_string(), value);
                }
            }
        }
    }
}

/// A single decoded page of a list response.
pub trait Page: Send + Debug {
    /// Returns `true` if the backend reported further pages.
    fn has_more(&self) -> bool;

    /// Returns how to fetch the next page, or `None` if this is the last one.
    fn next_continuation(&self) -> Option<Continuation>;

    /// Takes the page's items, leaving the page empty.
    fn take_items(&mut self) -> Vec<Value>;
}

/// A `{data, has_more}` page.
#[derive(Debug, Deserialize)]
pub struct CursorPage {
    data: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default, alias = "next_page")]
    next_cursor: Option<String>,
    #[serde(default)]
    page: Option<u64>,
    #[serde(skip, default = "default_cursor_param")]
    param: &'static str,
    #[serde(skip)]
    number: u64,
    #[serde(skip)]
    len: usize,
}

const fn default_cursor_param() -> &'static str {
    "starting_after"
}

impl CursorPage {
    /// Decodes a cursor page from a response body.
    ///
    /// `number` is the one-based position of this page in the walk; it is
    /// used when the body carries neither a cursor nor a `page` field.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if `data` is missing or not an array.
    pub fn from_body(body: Value, param: &'static str, number: u64) -> Result<Self, ResourceError> {
        let mut page: Self = serde_json::from_value(body)
            .map_err(|e| ResourceError::deserialize("cursor page", e))?;
        page.param = param;
        page.number = number;
        page.len = page.data.len();
        Ok(page)
    }
}

impl Page for CursorPage {
    /// An empty page ends the walk whatever the backend reports.
    fn has_more(&self) -> bool {
        self.has_more && self.len > 0
    }

    /// Uses the explicit next cursor when present, otherwise the last
    /// item's `id`, otherwise the next page number.
    fn next_continuation(&self) -> Option<Continuation> {
        if !self.has_more() {
            if self.has_more {
                tracing::warn!("Empty page reported has_more; stopping pagination");
            }
            return None;
        }

        let cursor = self.next_cursor.clone().or_else(|| {
            self.data.last().and_then(|item| match item.get("id") {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            })
        });

        Some(cursor.map_or_else(
            || Continuation::Page {
                page: self.page.unwrap_or(self.number) + 1,
            },
            |cursor| Continuation::Cursor {
                param: self.param,
                cursor,
            },
        ))
    }

    fn take_items(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.data)
    }
}

/// An `{items, total, limit, offset}` page.
#[derive(Debug, Deserialize)]
pub struct OffsetPage {
    items: Vec<Value>,
    total: u64,
    #[serde(default)]
    limit: Option<u64>,
    #[serde(default)]
    offset: u64,
    #[serde(skip)]
    len: u64,
}

impl OffsetPage {
    /// Decodes an offset page from a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if `items` or `total` is missing.
    pub fn from_body(body: Value) -> Result<Self, ResourceError> {
        let mut page: Self = serde_json::from_value(body)
            .map_err(|e| ResourceError::deserialize("offset page", e))?;
        page.len = page.items.len() as u64;
        Ok(page)
    }
}

impl Page for OffsetPage {
    fn has_more(&self) -> bool {
        self.len > 0 && self.offset + self.len < self.total
    }

    fn next_continuation(&self) -> Option<Continuation> {
        self.has_more().then(|| Continuation::Offset {
            offset: self.offset + self.len,
            limit: self.limit.unwrap_or(self.len),
        })
    }

    fn take_items(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.items)
    }
}

/// Decodes a response body with the adapter for `shape`. `number` is the
/// one-based position of the page in the walk.
///
/// # Errors
///
/// Returns [`ResourceError::Deserialize`] if the body does not match the shape.
pub fn parse_page(
    shape: PageShape,
    body: Value,
    number: u64,
) -> Result<Box<dyn Page>, ResourceError> {
    Ok(match shape {
        PageShape::Cursor { param } => Box::new(CursorPage::from_body(body, param, number)?),
        PageShape::Offset => Box::new(OffsetPage::from_body(body)?),
    })
}

/// Lazily walks the pages of a list or search operation.
///
/// Nothing is fetched until [`to_array`](Self::to_array),
/// [`for_each`](Self::for_each) or [`first_page`](Self::first_page) is
/// awaited. Each walk starts again from the first page.
#[derive(Clone, Debug)]
pub struct AutoPager<T> {
    dispatcher: Dispatcher,
    prepared: PreparedRequest,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> AutoPager<T> {
    pub(crate) const fn new(dispatcher: Dispatcher, prepared: PreparedRequest) -> Self {
        Self {
            dispatcher,
            prepared,
            _marker: PhantomData,
        }
    }

    /// Returns the prepared first-page request.
    #[must_use]
    pub const fn prepared(&self) -> &PreparedRequest {
        &self.prepared
    }

    /// Fetches the first page and returns its raw body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Request`] if the request fails.
    pub async fn first_page(&self) -> Result<Value, ResourceError> {
        self.dispatcher.send(&self.prepared).await
    }

    async fn fetch(
        &self,
        number: u64,
        continuation: Option<&Continuation>,
    ) -> Result<Box<dyn Page>, ResourceError> {
        let mut request = self.prepared.request().clone();
        if let Some(continuation) = continuation {
            continuation.apply(&mut request);
            // A generated key covers one body; later pages need their own.
            if self.prepared.has_generated_idempotency_key() {
                request.extra_headers.insert(
                    IDEMPOTENCY_KEY_HEADER.to_string(),
                    generate_idempotency_key(),
                );
            }
        }

        let body = self.dispatcher.dispatch(request).await?;
        let page = parse_page(self.prepared.spec().page_shape(), body, number)?;

        tracing::debug!(
            "Fetched page {} of {} (has_more: {})",
            number,
            self.prepared.request().path,
            page.has_more()
        );
        Ok(page)
    }

    fn decode(item: Value) -> Result<T, ResourceError> {
        serde_json::from_value(item).map_err(|e| ResourceError::deserialize("list item", e))
    }

    /// Collects up to `limit` items, fetching pages until the backend
    /// reports no more or the limit is reached.
    ///
    /// A `limit` of zero fetches nothing. The final page is truncated if it
    /// overshoots.
    ///
    /// # Errors
    ///
    /// Returns the first page-fetch or decode error; items collected so far
    /// are discarded.
    pub async fn to_array(&self, limit: usize) -> Result<Vec<T>, ResourceError> {
        let mut collected = Vec::new();
        if limit == 0 {
            return Ok(collected);
        }

        let mut continuation = None;
        for number in 1.. {
            let mut page = self.fetch(number, continuation.as_ref()).await?;
            let next = page.next_continuation();

            for item in page.take_items() {
                if collected.len() >= limit {
                    break;
                }
                collected.push(Self::decode(item)?);
            }

            match next {
                Some(next) if collected.len() < limit => continuation = Some(next),
                _ => break,
            }
        }

        Ok(collected)
    }

    /// Invokes `callback` once per item in page order.
    ///
    /// Iteration stops as soon as the callback resolves to `false`, even
    /// mid-page, and no further page is requested. A backend that always
    /// reports more pages is walked until the callback stops it.
    ///
    /// # Errors
    ///
    /// Returns the first page-fetch or decode error. Items already passed
    /// to the callback are not retracted.
    pub async fn for_each<F, Fut>(&self, mut callback: F) -> Result<(), ResourceError>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut continuation = None;
        for number in 1.. {
            let mut page = self.fetch(number, continuation.as_ref()).await?;
            let next = page.next_continuation();

            for item in page.take_items() {
                if !callback(Self::decode(item)?).await {
                    return Ok(());
                }
            }

            match next {
                Some(next) => continuation = Some(next),
                None => break,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;
    use serde_json::json;

    #[test]
    fn test_cursor_page_uses_last_item_id() {
        let mut page = CursorPage::from_body(
            json!({"data": [{"id": "a"}, {"id": "b"}], "has_more": true}),
            "starting_after",
            1,
        )
        .unwrap();

        assert_eq!(
            page.next_continuation(),
            Some(Continuation::Cursor {
                param: "starting_after",
                cursor: "b".to_string()
            })
        );
        assert_eq!(page.take_items().len(), 2);
    }

    #[test]
    fn test_cursor_page_prefers_explicit_cursor() {
        let page = CursorPage::from_body(
            json!({"data": [{"id": "a"}], "has_more": true, "next_page": "tok_2"}),
            "page",
            1,
        )
        .unwrap();

        assert_eq!(
            page.next_continuation(),
            Some(Continuation::Cursor {
                param: "page",
                cursor: "tok_2".to_string()
            })
        );
    }

    #[test]
    fn test_cursor_page_without_more_has_no_continuation() {
        let page =
            CursorPage::from_body(json!({"data": [{"id": "a"}], "has_more": false}), "x", 1)
                .unwrap();
        assert!(!page.has_more());
        assert!(page.next_continuation().is_none());
    }

    #[test]
    fn test_cursor_page_without_cursor_or_id_advances_page_number() {
        let page =
            CursorPage::from_body(json!({"data": [1, 2], "has_more": true}), "starting_after", 2)
                .unwrap();
        assert_eq!(page.next_continuation(), Some(Continuation::Page { page: 3 }));

        let reported = CursorPage::from_body(
            json!({"data": [1], "has_more": true, "page": 7}),
            "starting_after",
            1,
        )
        .unwrap();
        assert_eq!(
            reported.next_continuation(),
            Some(Continuation::Page { page: 8 })
        );
    }

    #[test]
    fn test_empty_cursor_page_ends_walk() {
        let page = CursorPage::from_body(
            json!({"data": [], "has_more": true, "next_cursor": "c9"}),
            "starting_after",
            4,
        )
        .unwrap();
        assert!(!page.has_more());
        assert!(page.next_continuation().is_none());
    }

    #[test]
    fn test_offset_page_advances_by_item_count() {
        let page = OffsetPage::from_body(
            json!({"items": [1, 2], "total": 5, "limit": 2, "offset": 0}),
        )
        .unwrap();
        assert_eq!(
            page.next_continuation(),
            Some(Continuation::Offset {
                offset: 2,
                limit: 2
            })
        );

        let last = OffsetPage::from_body(
            json!({"items": [5], "total": 5, "limit": 2, "offset": 4}),
        )
        .unwrap();
        assert!(last.next_continuation().is_none());
    }

    #[test]
    fn test_offset_page_empty_page_stops() {
        let page =
            OffsetPage::from_body(json!({"items": [], "total": 99, "offset": 10})).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_parse_page_rejects_wrong_shape() {
        let result = parse_page(PageShape::Offset, json!({"data": [], "has_more": false}), 1);
        assert!(matches!(result, Err(ResourceError::Deserialize { .. })));
    }

    #[test]
    fn test_continuation_applies_to_query_or_body() {
        let cursor = Continuation::Cursor {
            param: "starting_after",
            cursor: "ord_9".to_string(),
        };
        let mut get = HttpRequest::builder(HttpMethod::Get, "/v1/orders")
            .build()
            .unwrap();
        cursor.apply(&mut get);
        assert_eq!(get.query["starting_after"], "ord_9");

        let offset = Continuation::Offset {
            offset: 20,
            limit: 10,
        };
        let mut post = HttpRequest::builder(HttpMethod::Post, "/v1/orders/search")
            .body(json!({"query": "x"}))
            .build()
            .unwrap();
        offset.apply(&mut post);
        assert_eq!(post.body.unwrap(), json!({"query": "x", "offset": 20, "limit": 10}));
    }
}

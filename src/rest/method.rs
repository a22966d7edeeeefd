//! Method specs: static descriptors of an API operation.
//!
//! A [`MethodSpec`] fixes the HTTP verb and path template of one operation.
//! The path is either relative to the owning resource (`path`) or absolute
//! below the configured base path (`full_path`), never both.
//!
//! # Example
//!
//! ```rust
//! use stateset::rest::{MethodSpec, MethodType};
//! use stateset::HttpMethod;
//!
//! let list = MethodSpec::builder(HttpMethod::Get)
//!     .path("")
//!     .method_type(MethodType::List)
//!     .build()
//!     .unwrap();
//! assert!(list.is_paginated());
//!
//! let both = MethodSpec::builder(HttpMethod::Get)
//!     .path("{id}")
//!     .full_path("/orders/{id}")
//!     .build();
//! assert!(both.is_err());
//! ```

use crate::clients::HttpMethod;
use crate::rest::ResourceError;

/// Classifies operations that return a page of results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodType {
    /// A plain list endpoint.
    List,
    /// A search endpoint with list-shaped results.
    Search,
}

/// The page-shape convention of a paginated endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageShape {
    /// `{data: [...], has_more: bool}`; the next page is requested by sending
    /// the last cursor under `param`.
    Cursor {
        /// Request parameter carrying the cursor (e.g. `starting_after`).
        param: &'static str,
    },
    /// `{items: [...], total, limit, offset}`; the next page is requested
    /// with advanced `offset` and `limit` parameters.
    Offset,
}

impl Default for PageShape {
    fn default() -> Self {
        Self::Cursor {
            param: "starting_after",
        }
    }
}

/// Where a method's path template is rooted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSpec {
    /// Appended to the resource path (e.g. `{id}/submit`).
    Relative(String),
    /// Used as-is below the configured base path (e.g. `/orders/{id}/items`).
    Full(String),
}

/// Immutable descriptor of an API operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSpec {
    http_method: HttpMethod,
    path: PathSpec,
    method_type: Option<MethodType>,
    page_shape: PageShape,
}

impl MethodSpec {
    /// Creates a new builder for a spec with the given HTTP method.
    #[must_use]
    pub const fn builder(http_method: HttpMethod) -> MethodSpecBuilder {
        MethodSpecBuilder {
            http_method,
            path: None,
            full_path: None,
            method_type: None,
            page_shape: None,
        }
    }

    /// Shorthand for a spec with a resource-relative path.
    #[must_use]
    pub fn relative(http_method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method,
            path: PathSpec::Relative(path.into()),
            method_type: None,
            page_shape: PageShape::default(),
        }
    }

    /// Marks the spec as a list or search operation.
    #[must_use]
    pub fn with_method_type(mut self, method_type: MethodType) -> Self {
        self.method_type = Some(method_type);
        self
    }

    /// Sets the page-shape convention.
    #[must_use]
    pub fn with_page_shape(mut self, page_shape: PageShape) -> Self {
        self.page_shape = page_shape;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    /// Returns the path spec.
    #[must_use]
    pub const fn path(&self) -> &PathSpec {
        &self.path
    }

    /// Returns the method type, if this is a list or search operation.
    #[must_use]
    pub const fn method_type(&self) -> Option<MethodType> {
        self.method_type
    }

    /// Returns the page-shape convention used when paginating.
    #[must_use]
    pub const fn page_shape(&self) -> PageShape {
        self.page_shape
    }

    /// Returns `true` for list and search operations.
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.method_type.is_some()
    }

    /// Returns the absolute path template for this operation.
    ///
    /// Relative paths are joined as `base_path/resource_path/path`, skipping
    /// empty segments. Full paths are prefixed with `base_path` only.
    #[must_use]
    pub fn template(&self, base_path: &str, resource_path: &str) -> String {
        let parts: Vec<&str> = match &self.path {
            PathSpec::Relative(path) => vec![base_path, resource_path, path],
            PathSpec::Full(path) => vec![base_path, path],
        };

        let joined = parts
            .iter()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{joined}")
    }
}

/// Builder for [`MethodSpec`].
#[derive(Debug)]
pub struct MethodSpecBuilder {
    http_method: HttpMethod,
    path: Option<String>,
    full_path: Option<String>,
    method_type: Option<MethodType>,
    page_shape: Option<PageShape>,
}

impl MethodSpecBuilder {
    /// Sets a path relative to the owning resource.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets a path rooted at the configured base path.
    #[must_use]
    pub fn full_path(mut self, full_path: impl Into<String>) -> Self {
        self.full_path = Some(full_path.into());
        self
    }

    /// Marks the operation as a list or search.
    #[must_use]
    pub const fn method_type(mut self, method_type: MethodType) -> Self {
        self.method_type = Some(method_type);
        self
    }

    /// Sets the page-shape convention. Defaults to cursor pagination on
    /// `starting_after`.
    #[must_use]
    pub const fn page_shape(mut self, page_shape: PageShape) -> Self {
        self.page_shape = Some(page_shape);
        self
    }

    /// Builds the spec.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidMethodSpec`] unless exactly one of
    /// `path` and `full_path` is set.
    pub fn build(self) -> Result<MethodSpec, ResourceError> {
        let path = match (self.path, self.full_path) {
            (Some(path), None) => PathSpec::Relative(path),
            (None, Some(full_path)) => PathSpec::Full(full_path),
            (Some(_), Some(_)) => {
                return Err(ResourceError::InvalidMethodSpec {
                    reason: "only one of 'path' and 'full_path' may be set",
                })
            }
            (None, None) => {
                return Err(ResourceError::InvalidMethodSpec {
                    reason: "one of 'path' or 'full_path' is required",
                })
            }
        };

        Ok(MethodSpec {
            http_method: self.http_method,
            path,
            method_type: self.method_type,
            page_shape: self.page_shape.unwrap_or_default(),
        })
    }
}

//! Resources built from a method-spec table.
//!
//! A [`Resource`] is a named collection of [`MethodSpec`]s sharing a path
//! prefix and a [`Dispatcher`]. It is assembled once, at client
//! construction, by a [`ResourceBuilder`]; nothing is added afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use stateset::rest::{MethodSpec, Resource};
//! use stateset::HttpMethod;
//! use serde_json::json;
//!
//! let warehouses = Resource::builder("Warehouse", "warehouses")
//!     .standard_methods()
//!     .method("restock", MethodSpec::relative(HttpMethod::Post, "{id}/restock"))
//!     .build(dispatcher);
//!
//! let warehouse = warehouses.call("retrieve", vec![json!("wh_1")]).await?;
//! let all = warehouses.paginate::<serde_json::Value>("list", vec![])?.to_array(100).await?;
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::HttpMethod;
use crate::rest::{
    AutoPager, Dispatcher, MethodSpec, MethodType, PreparedRequest, ResourceError,
    ResourceStatus, TaggedResponse,
};

/// A named set of operations on one API resource.
#[derive(Clone, Debug)]
pub struct Resource {
    name: &'static str,
    path: String,
    methods: HashMap<String, MethodSpec>,
    dispatcher: Dispatcher,
}

impl Resource {
    /// Creates a builder for a resource rooted at `path` (e.g. `orders`).
    #[must_use]
    pub fn builder(name: &'static str, path: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            name,
            path: path.into(),
            methods: Vec::new(),
        }
    }

    /// Returns the resource name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the resource path prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the dispatcher shared by this resource's methods.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the names of all methods, sorted.
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up a method spec by name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownMethod`] if no method has that name.
    pub fn spec(&self, method: &str) -> Result<&MethodSpec, ResourceError> {
        self.methods
            .get(method)
            .ok_or_else(|| ResourceError::UnknownMethod {
                resource: self.name.to_string(),
                method: method.to_string(),
            })
    }

    /// Assembles the request for `method` without sending it.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::prepare`], plus [`ResourceError::UnknownMethod`].
    pub fn prepare(&self, method: &str, args: Vec<Value>) -> Result<PreparedRequest, ResourceError> {
        self.dispatcher.prepare(&self.path, self.spec(method)?, args)
    }

    /// Calls `method` and returns the raw payload.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::request`], plus [`ResourceError::UnknownMethod`].
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, ResourceError> {
        let prepared = self.prepare(method, args)?;
        self.dispatcher.send(&prepared).await
    }

    /// Calls `method` and decodes the payload into `T`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call), plus [`ResourceError::Deserialize`].
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<T, ResourceError> {
        let payload = self.call(method, args).await?;
        serde_json::from_value(payload).map_err(|e| ResourceError::deserialize(self.name, e))
    }

    /// Calls a lifecycle command and maps the payload to a [`TaggedResponse`].
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call), plus [`ResourceError::UnrecognizedStatus`]
    /// if the returned status is not one of `S::ALL`.
    pub async fn command<S: ResourceStatus>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<TaggedResponse<S>, ResourceError> {
        let payload = self.call(method, args).await?;
        TaggedResponse::from_payload(payload)
    }

    /// Prepares a list or search method for auto-pagination.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::paginate`], plus [`ResourceError::UnknownMethod`].
    pub fn paginate<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<AutoPager<T>, ResourceError> {
        self.dispatcher.paginate(&self.path, self.spec(method)?, args)
    }
}

/// Builder for [`Resource`].
#[derive(Debug)]
pub struct ResourceBuilder {
    name: &'static str,
    path: String,
    methods: Vec<(String, MethodSpec)>,
}

impl ResourceBuilder {
    /// Adds a method. A later method with the same name replaces an earlier one.
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, spec: MethodSpec) -> Self {
        self.methods.push((name.into(), spec));
        self
    }

    /// Adds `create`, `retrieve`, `update`, `list` and `del`.
    #[must_use]
    pub fn standard_methods(self) -> Self {
        self.method("create", MethodSpec::relative(HttpMethod::Post, ""))
            .method("retrieve", MethodSpec::relative(HttpMethod::Get, "{id}"))
            .method("update", MethodSpec::relative(HttpMethod::Put, "{id}"))
            .method(
                "list",
                MethodSpec::relative(HttpMethod::Get, "").with_method_type(MethodType::List),
            )
            .method("del", MethodSpec::relative(HttpMethod::Delete, "{id}"))
    }

    /// Builds the resource over `dispatcher`.
    #[must_use]
    pub fn build(self, dispatcher: Dispatcher) -> Resource {
        Resource {
            name: self.name,
            path: self.path,
            methods: self.methods.into_iter().collect(),
            dispatcher,
        }
    }
}

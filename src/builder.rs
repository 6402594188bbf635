//! Fluent, immutable request builder.
//!
//! Every setter returns a new builder with its argument merged over the
//! current params; the receiver is never changed, so a partially configured
//! builder can be shared and specialized freely. Terminal verbs hand the
//! final params to the bound adapter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::adapter::{DispatchOptions, Fetch};
use crate::response::ResponseProxy;
use crate::types::{Body, Credentials, Params, RequestMode, RequestOptions};

#[derive(Clone)]
pub struct RequestBuilder {
    fetch: Arc<dyn Fetch>,
    params: Params,
    options: DispatchOptions,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("params", &self.params)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self {
            fetch,
            params: Params::default(),
            options: DispatchOptions::default(),
        }
    }

    /// Params accumulated so far.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn dispatch_options(&self) -> &DispatchOptions {
        &self.options
    }

    fn clone_with(&self, patch: Params) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
            params: self.params.merge(patch),
            options: self.options.clone(),
        }
    }

    pub fn url(&self, url: impl Into<String>) -> Self {
        self.clone_with(Params::new(url))
    }

    pub fn headers(&self, headers: HashMap<String, String>) -> Self {
        self.clone_with(Params {
            headers,
            ..Default::default()
        })
    }

    pub fn header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.clone_with(Params::default().with_header(name, value))
    }

    pub fn query(&self, query: Map<String, Value>) -> Self {
        self.clone_with(Params {
            query,
            ..Default::default()
        })
    }

    pub fn options(&self, options: RequestOptions) -> Self {
        self.clone_with(Params::default().with_options(options))
    }

    pub fn mode(&self, mode: RequestMode) -> Self {
        self.options(RequestOptions {
            mode: Some(mode),
            credentials: None,
        })
    }

    pub fn credentials(&self, credentials: Credentials) -> Self {
        self.options(RequestOptions {
            mode: None,
            credentials: Some(credentials),
        })
    }

    pub fn body(&self, body: impl Into<Body>) -> Self {
        self.clone_with(Params::default().with_body(body))
    }

    pub fn timeout(&self, timeout: Duration) -> Self {
        self.clone_with(Params::default().with_timeout(timeout))
    }

    pub fn signal(&self, signal: CancellationToken) -> Self {
        self.clone_with(Params::default().with_signal(signal))
    }

    /// Enable or bypass the adapter cache for calls made from this builder.
    pub fn cache(&self, enabled: bool) -> Self {
        let mut next = self.clone();
        next.options = next.options.with_cache(enabled);
        next
    }

    pub fn accept(&self, value: impl Into<String>) -> Self {
        self.header("accept", value)
    }

    pub fn content(&self, value: impl Into<String>) -> Self {
        self.header("content-type", value)
    }

    pub fn auth(&self, value: impl Into<String>) -> Self {
        self.header("authorization", value)
    }

    /// `Content-Type: application/json` plus `value` serialized as a text body.
    pub fn json(&self, value: &Value) -> Self {
        self.content("application/json")
            .body(Body::Text(value.to_string()))
    }

    pub fn get(&self) -> ResponseProxy {
        self.method("get")
    }

    pub fn head(&self) -> ResponseProxy {
        self.method("head")
    }

    pub fn post(&self) -> ResponseProxy {
        self.method("post")
    }

    pub fn put(&self) -> ResponseProxy {
        self.method("put")
    }

    pub fn patch(&self) -> ResponseProxy {
        self.method("patch")
    }

    pub fn delete(&self) -> ResponseProxy {
        self.method("delete")
    }

    /// Dispatch with an arbitrary verb.
    pub fn method(&self, method: impl Into<String>) -> ResponseProxy {
        let params = self.params.merge(Params::default().with_method(method));
        self.fetch.fetch(params, self.options.clone())
    }
}

//! Request parameters.
//!
//! `Params` describes the intent of one request. The adapter pipeline only
//! ever sees it through a shared reference, so every hook observes the same
//! snapshot.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

/// Cross-origin mode requested from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    #[default]
    Cors,
    NoCors,
    SameOrigin,
    Navigate,
}

/// Credential inclusion policy requested from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    #[default]
    SameOrigin,
    Include,
}

/// Per-request transport policy overrides. Unset fields fall back to the
/// adapter's defaults in `options_for_request`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RequestMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    /// Key-wise merge; fields set on `other` win.
    pub fn merge(self, other: RequestOptions) -> Self {
        Self {
            mode: other.mode.or(self.mode),
            credentials: other.credentials.or(self.credentials),
        }
    }
}

/// Resolved transport policy attached to an outbound message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPolicy {
    pub mode: RequestMode,
    pub credentials: Credentials,
}

/// Request body: pre-serialized text or a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Sent verbatim.
    Text(String),
    /// Serialized to JSON text by `body_for_request`.
    Json(Value),
}

impl Body {
    /// An empty text body or a JSON `null` counts as no body at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Json(value) => value.is_null(),
        }
    }

    /// Merge `other` over `self`. JSON objects merge key-wise and recursively,
    /// anything else is replaced.
    pub fn merge(self, other: Body) -> Body {
        match (self, other) {
            (Self::Json(mut base), Self::Json(patch)) => {
                deep_merge(&mut base, patch);
                Self::Json(base)
            }
            (_, other) => other,
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Recursive object merge; non-object values on the right replace the left.
pub(crate) fn deep_merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

fn insert_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Declarative description of one request.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Path (resolved against host/namespace) or absolute URL.
    pub url: String,
    /// HTTP verb; `GET` when unset.
    pub method: Option<String>,
    /// Per-request headers, merged over the adapter defaults.
    pub headers: HashMap<String, String>,
    /// Query parameters appended to the URL.
    pub query: Map<String, Value>,
    pub body: Option<Body>,
    pub options: RequestOptions,
    /// Caller-owned cancellation handle.
    pub signal: Option<CancellationToken>,
    pub timeout: Option<Duration>,
}

impl Params {
    /// Params for a GET of `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set a header, replacing any existing one whose name differs only in case.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether a non-empty body was supplied.
    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|body| !body.is_empty())
    }

    /// Produce a new snapshot with `patch` merged over `self`.
    ///
    /// Nested mappings (`headers`, `query`, `options`, JSON bodies) merge
    /// key-wise; scalars set on `patch` overwrite. `self` is left untouched.
    pub fn merge(&self, patch: Params) -> Params {
        let mut merged = self.clone();

        if !patch.url.is_empty() {
            merged.url = patch.url;
        }
        if patch.method.is_some() {
            merged.method = patch.method;
        }
        for (name, value) in patch.headers {
            insert_header(&mut merged.headers, name, value);
        }

        let mut query = Value::Object(std::mem::take(&mut merged.query));
        deep_merge(&mut query, Value::Object(patch.query));
        if let Value::Object(query) = query {
            merged.query = query;
        }

        merged.body = match (merged.body.take(), patch.body) {
            (Some(base), Some(patch)) => Some(base.merge(patch)),
            (base, patch) => patch.or(base),
        };
        merged.options = merged.options.merge(patch.options);
        if patch.signal.is_some() {
            merged.signal = patch.signal;
        }
        if patch.timeout.is_some() {
            merged.timeout = patch.timeout;
        }
        merged
    }
}

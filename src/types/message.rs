//! Transport-ready outbound message.

use reqwest::Method;
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use super::params::FetchPolicy;

/// A fully resolved request, owned by the adapter for one dispatch.
///
/// GET and HEAD messages never carry a body; `build_request` rejects such
/// params before a message exists.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub method: Method,
    /// Absolute URL, or a path relative to the current origin.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub policy: FetchPolicy,
    /// Effective cancellation signal the transport must observe.
    pub signal: Option<CancellationToken>,
}

impl OutboundMessage {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            policy: FetchPolicy::default(),
            signal: None,
        }
    }

    /// Whether the attached signal has already fired.
    pub fn is_cancelled(&self) -> bool {
        self.signal
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> crate::error::Result<Option<serde_json::Value>> {
        self.body
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }
}

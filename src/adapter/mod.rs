//! Adapter: the request-lifecycle orchestrator.
//!
//! # Data Flow
//! ```text
//! Params (borrowed, never mutated)
//!     → build_request: method → url → headers → options → signal → body
//!     → dispatch: cache lookup → cancel scope → transport → cache store → release
//!     → ResponseProxy: body read → normalize → success / NetworkError
//! ```
//!
//! Every stage is a provided method on [`Adapter`]; a concrete adapter
//! overrides only the stages it needs. Stages are async, so an override may
//! suspend (e.g. to fetch a token) without the caller noticing.

mod fetch;
mod options;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub use fetch::{AdapterExt, Fetch, FetchAdapter, fetch};
pub use options::DispatchOptions;

use crate::cancel::{self, Reconciled};
use crate::error::{AdapterError, Result};
use crate::http::headers::{ensure_content_type, merge_headers, to_header_map};
use crate::http::transport::Transport;
use crate::http::url::{add_query_params, is_absolute_url, resolve_url};
use crate::types::{
    AdapterConfig, Body, FetchPolicy, OutboundMessage, Params, Response, ResponseMeta,
};

/// Method used when params do not name one.
pub const DEFAULT_METHOD: &str = "GET";

/// Overridable request pipeline plus dispatch orchestration.
///
/// Implementors supply configuration and a transport; everything else has a
/// default.
///
/// ```rust,ignore
/// struct Api { config: AdapterConfig, transport: Arc<dyn Transport> }
///
/// #[async_trait]
/// impl Adapter for Api {
///     fn config(&self) -> &AdapterConfig { &self.config }
///     fn transport(&self) -> &dyn Transport { self.transport.as_ref() }
///
///     fn normalize_success(&self, _: &Params, body: Value, _: &ResponseMeta) -> Value {
///         body.get("data").cloned().unwrap_or(body)
///     }
/// }
/// ```
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Host, namespace, default headers/timeout and cache.
    fn config(&self) -> &AdapterConfig;

    /// The injected wire transport.
    fn transport(&self) -> &dyn Transport;

    // ------------------------------------------------------------------
    // Pipeline stages
    // ------------------------------------------------------------------

    async fn method_for_request(&self, params: &Params) -> Result<String> {
        Ok(params
            .method
            .clone()
            .unwrap_or_else(|| DEFAULT_METHOD.to_string()))
    }

    async fn path_for_request(&self, params: &Params) -> Result<String> {
        Ok(params.url.clone())
    }

    async fn query_for_request(&self, params: &Params) -> Result<Map<String, Value>> {
        Ok(params.query.clone())
    }

    /// Resolved path plus serialized query.
    async fn url_for_request(&self, params: &Params) -> Result<String> {
        let path = self.path_for_request(params).await?;
        let query = self.query_for_request(params).await?;
        Ok(add_query_params(&self.build_url(&path), &query))
    }

    /// Resolve `path` against the configured host and namespace. Absolute
    /// URLs are returned as given and skip `build_server_url`.
    fn build_url(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        let config = self.config();
        let url = resolve_url(config.host.as_deref(), config.namespace.as_deref(), path);
        self.build_server_url(url)
    }

    /// Last rewrite of a resolved relative URL.
    fn build_server_url(&self, url: String) -> String {
        url
    }

    /// Adapter defaults merged with per-request headers (request wins).
    async fn headers_for_request(&self, params: &Params) -> Result<HashMap<String, String>> {
        Ok(merge_headers(&self.config().headers, &params.headers))
    }

    /// Text bodies pass through; JSON bodies are serialized.
    async fn body_for_request(&self, params: &Params) -> Result<Option<String>> {
        match &params.body {
            Some(body) if body.is_empty() => Ok(None),
            Some(Body::Text(text)) => Ok(Some(text.clone())),
            Some(Body::Json(value)) => Ok(Some(serde_json::to_string(value)?)),
            None => Ok(None),
        }
    }

    /// Defaults: `cors` / `same-origin`.
    async fn options_for_request(&self, params: &Params) -> Result<FetchPolicy> {
        Ok(FetchPolicy {
            mode: params.options.mode.unwrap_or_default(),
            credentials: params.options.credentials.unwrap_or_default(),
        })
    }

    /// The caller's signal, untouched; reconciled with timeouts at dispatch.
    async fn signal_for_request(&self, params: &Params) -> Result<Option<CancellationToken>> {
        Ok(params.signal.clone())
    }

    fn should_cache_request(&self, message: &OutboundMessage) -> bool {
        self.config()
            .cache
            .as_ref()
            .is_some_and(|cache| cache.should_cache(message, true))
    }

    // ------------------------------------------------------------------
    // Normalization
    // ------------------------------------------------------------------

    fn normalize_success(&self, _params: &Params, body: Value, _response: &ResponseMeta) -> Value {
        body
    }

    fn normalize_error(&self, _params: &Params, body: Value, _response: &ResponseMeta) -> Value {
        body
    }

    fn normalize(&self, params: &Params, body: Value, response: &ResponseMeta) -> Value {
        if response.ok {
            self.normalize_success(params, body, response)
        } else {
            self.normalize_error(params, body, response)
        }
    }

    // ------------------------------------------------------------------
    // Orchestration
    // ------------------------------------------------------------------

    /// Run the pipeline and materialize a transport-ready message.
    ///
    /// Fails with [`AdapterError::Validation`] when a GET or HEAD request
    /// carries a body; no transport is involved at that point.
    async fn build_request(&self, params: &Params) -> Result<OutboundMessage> {
        let method = self.method_for_request(params).await?;
        let url = self.url_for_request(params).await?;
        let headers = self.headers_for_request(params).await?;
        let policy = self.options_for_request(params).await?;
        let signal = self.signal_for_request(params).await?;

        let method = parse_method(&method)?;
        let mut headers: HeaderMap = to_header_map(&headers)?;
        let mut body = None;

        if method == Method::GET || method == Method::HEAD {
            if params.has_body() {
                return Err(AdapterError::validation(format!("{method} request with body")));
            }
        } else if let Some(serialized) = self.body_for_request(params).await? {
            if !serialized.is_empty() {
                ensure_content_type(&mut headers);
                body = Some(serialized);
            }
        }

        tracing::trace!(target: "fetch_adapter::http", method=%method, url=%url, has_body=body.is_some(), "request built");

        Ok(OutboundMessage {
            method,
            url,
            headers,
            body,
            policy,
            signal,
        })
    }

    /// Send one message: serve from cache when possible, otherwise run the
    /// transport under the reconciled cancel scope and store the result.
    async fn dispatch(
        &self,
        mut message: OutboundMessage,
        options: &DispatchOptions,
    ) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let cache = match &self.config().cache {
            Some(cache) if options.cache_enabled() && self.should_cache_request(&message) => {
                Some(cache.clone())
            }
            _ => None,
        };

        if let Some(cache) = &cache {
            if let Some(hit) = cache.match_request(&message).await? {
                tracing::debug!(target: "fetch_adapter::http", %request_id, url=%message.url, status=hit.status(), cache="hit", "served from cache");
                return Ok(hit);
            }
        }

        let timeout = options.timeout.or(self.config().timeout);
        let external = options.signal.clone().or_else(|| message.signal.take());
        let mut scope = match cancel::reconcile(external, timeout) {
            Reconciled::Cancelled => {
                tracing::debug!(target: "fetch_adapter::http", %request_id, url=%message.url, "signal cancelled before dispatch");
                return Err(AdapterError::cancelled(
                    "The operation was aborted before dispatch",
                ));
            }
            Reconciled::Proceed(scope) => scope,
        };
        message.signal = scope.signal().cloned();

        tracing::debug!(target: "fetch_adapter::http", %request_id, method=%message.method, url=%message.url, timeout=?timeout, cache=cache.is_some(), "dispatching request");

        let result = self.transport().send(&message).await;
        scope.release();

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(target: "fetch_adapter::http", %request_id, url=%message.url, trigger=?scope.trigger(), err=%error, "request failed");
                return Err(error);
            }
        };
        tracing::debug!(target: "fetch_adapter::http", %request_id, url=%message.url, status=response.status(), "response received");

        if let Some(cache) = &cache {
            let stored = cache.put(&message, &response).await?;
            tracing::debug!(target: "fetch_adapter::http", %request_id, url=%message.url, stored, "cache updated");
        }

        Ok(response)
    }
}

/// Uppercase and validate an HTTP method token.
fn parse_method(method: &str) -> Result<Method> {
    let upper = method.to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes())
        .map_err(|_| AdapterError::validation(format!("invalid HTTP method '{method}'")))
}

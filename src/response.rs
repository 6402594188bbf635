//! Deferred, lazily normalized view over a pending dispatch.
//!
//! A [`ResponseProxy`] is two things kept apart on purpose:
//! - awaiting it (`.await` / [`ResponseProxy::wait`]) yields the raw
//!   [`Response`], whatever its status;
//! - its body accessors ([`json`](ResponseProxy::json),
//!   [`text`](ResponseProxy::text)) read the body, run the adapter's
//!   normalization and turn unsuccessful statuses into
//!   [`AdapterError::Network`].
//!
//! Every accessor consumes the proxy, so the body is read once per dispatch.
//! Reading it again means dispatching again.

use std::collections::HashMap;
use std::future::{Future, IntoFuture};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AdapterError, Result};
use crate::types::{NO_CONTENT, Response, ResponseMeta};

/// Body normalization applied before a body is returned or reified.
pub type Normalizer = Arc<dyn Fn(Value, &ResponseMeta) -> Value + Send + Sync>;

/// Normalizer that returns the body unchanged.
pub fn identity_normalizer() -> Normalizer {
    Arc::new(|body: Value, _: &ResponseMeta| body)
}

#[derive(Debug, Clone, Copy)]
enum BodyKind {
    Json,
    Text,
}

/// Pending response plus the normalization bound to its request.
pub struct ResponseProxy {
    pending: BoxFuture<'static, Result<Response>>,
    normalize: Normalizer,
}

impl std::fmt::Debug for ResponseProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseProxy").finish_non_exhaustive()
    }
}

impl ResponseProxy {
    pub fn new<F>(pending: F, normalize: Normalizer) -> Self
    where
        F: Future<Output = Result<Response>> + Send + 'static,
    {
        Self {
            pending: Box::pin(pending),
            normalize,
        }
    }

    /// Wait for the dispatch to settle and return the raw response.
    pub async fn wait(self) -> Result<Response> {
        self.pending.await
    }

    /// Parse the body as JSON and normalize it.
    ///
    /// A 204 on an ok response yields `Value::Null` without parsing.
    pub async fn json(self) -> Result<Value> {
        let normalize = self.normalize;
        let response = self.pending.await?;
        respond(read_body(response, BodyKind::Json, &normalize))
    }

    /// [`json`](Self::json), then deserialize into `T`.
    pub async fn json_as<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.json().await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Read the body as text and normalize it.
    ///
    /// Normalization sees the text as a JSON string; a non-string result is
    /// rendered back as JSON text. A 204 on an ok response yields `""`.
    pub async fn text(self) -> Result<String> {
        let normalize = self.normalize;
        let response = self.pending.await?;
        respond(read_body(response, BodyKind::Text, &normalize)).map(into_text)
    }

    /// Inspectable view with the body still unread.
    pub async fn response(self) -> Result<ResponseView> {
        let response = self.pending.await?;
        let meta = response.meta();
        Ok(ResponseView {
            ok: meta.ok,
            status: meta.status,
            status_text: meta.status_text.clone(),
            headers: meta.header_map(),
            response,
            normalize: self.normalize,
        })
    }
}

impl IntoFuture for ResponseProxy {
    type Output = Result<Response>;
    type IntoFuture = BoxFuture<'static, Result<Response>>;

    fn into_future(self) -> Self::IntoFuture {
        self.pending
    }
}

/// Response head plus deferred body readers.
///
/// Unlike the proxy accessors these never split on status: an error body is
/// returned (normalized) like any other.
pub struct ResponseView {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    response: Response,
    normalize: Normalizer,
}

impl std::fmt::Debug for ResponseView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseView")
            .field("ok", &self.ok)
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl ResponseView {
    pub fn json(self) -> Result<Value> {
        read_body(self.response, BodyKind::Json, &self.normalize).1
    }

    pub fn text(self) -> Result<String> {
        read_body(self.response, BodyKind::Text, &self.normalize)
            .1
            .map(into_text)
    }

    /// Give up the view and take the raw response.
    pub fn into_response(self) -> Response {
        self.response
    }
}

fn read_body(
    response: Response,
    kind: BodyKind,
    normalize: &Normalizer,
) -> (ResponseMeta, Result<Value>) {
    let (meta, bytes) = response.into_parts();
    if meta.ok && meta.status == NO_CONTENT {
        let empty = match kind {
            BodyKind::Json => Value::Null,
            BodyKind::Text => Value::String(String::new()),
        };
        return (meta, Ok(empty));
    }

    let raw = match kind {
        BodyKind::Json => serde_json::from_slice(&bytes).map_err(AdapterError::from),
        BodyKind::Text => Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
    };
    let body = raw.map(|body| normalize(body, &meta));
    (meta, body)
}

fn respond((meta, body): (ResponseMeta, Result<Value>)) -> Result<Value> {
    if meta.ok {
        return body;
    }
    Err(AdapterError::network(meta.status, body.ok(), meta))
}

fn into_text(body: Value) -> String {
    match body {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn proxy(response: Response) -> ResponseProxy {
        ResponseProxy::new(async move { Ok(response) }, identity_normalizer())
    }

    #[tokio::test]
    async fn json_returns_body_on_success() {
        let body = proxy(Response::json_body(200, &json!({"id": 7}))).json().await.unwrap();
        assert_eq!(body, json!({"id": 7}));
    }

    #[tokio::test]
    async fn no_content_skips_deserialization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let normalize: Normalizer = Arc::new(move |body: Value, _: &ResponseMeta| {
            counter.fetch_add(1, Ordering::SeqCst);
            body
        });
        let no_content = || Response::new(204, HeaderMap::new(), "not json");

        let json = ResponseProxy::new(async move { Ok(no_content()) }, normalize.clone())
            .json()
            .await
            .unwrap();
        let text = ResponseProxy::new(async move { Ok(no_content()) }, normalize)
            .text()
            .await
            .unwrap();

        assert_eq!(json, Value::Null);
        assert_eq!(text, "");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unsuccessful_status_becomes_network_error() {
        let normalize: Normalizer = Arc::new(|body: Value, meta: &ResponseMeta| json!({"status": meta.status, "error": body}));
        let response = Response::json_body(422, &json!({"field": "title"}));

        let err = ResponseProxy::new(async move { Ok(response) }, normalize)
            .json()
            .await
            .unwrap_err();

        let network = err.as_network().expect("network error");
        assert_eq!(network.status, 422);
        assert_eq!(
            network.body,
            Some(json!({"status": 422, "error": {"field": "title"}}))
        );
        assert_eq!(network.response.status_text, "Unprocessable Entity");
    }

    #[tokio::test]
    async fn undecodable_error_body_is_none() {
        let err = proxy(Response::new(500, HeaderMap::new(), "<html>"))
            .json()
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.as_network().unwrap().body, None);
    }

    #[tokio::test]
    async fn text_normalization_can_reshape_body() {
        let normalize: Normalizer = Arc::new(|body: Value, _: &ResponseMeta| match body {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        });
        let text = ResponseProxy::new(
            async { Ok(Response::new(200, HeaderMap::new(), "hello")) },
            normalize,
        )
        .text()
        .await
        .unwrap();
        assert_eq!(text, "HELLO");
    }

    #[tokio::test]
    async fn response_view_does_not_split_on_status() {
        let view = proxy(Response::json_body(404, &json!({"missing": true})))
            .response()
            .await
            .unwrap();
        assert!(!view.ok);
        assert_eq!(view.status, 404);
        assert_eq!(view.headers["content-type"], "application/json");
        assert_eq!(view.json().unwrap(), json!({"missing": true}));
    }

    #[tokio::test]
    async fn awaiting_yields_raw_response() {
        let response = proxy(Response::new(503, HeaderMap::new(), "down")).await.unwrap();
        assert_eq!(response.status(), 503);

        let failed = ResponseProxy::new(
            async { Err(AdapterError::cancelled("aborted")) },
            identity_normalizer(),
        );
        assert!(failed.wait().await.unwrap_err().is_cancellation());
    }

    #[tokio::test]
    async fn json_as_deserializes() {
        #[derive(serde::Deserialize)]
        struct Post {
            id: u32,
        }
        let post: Post = proxy(Response::json_body(200, &json!({"id": 3})))
            .json_as()
            .await
            .unwrap();
        assert_eq!(post.id, 3);
    }
}

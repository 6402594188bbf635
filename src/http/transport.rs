//! HTTP transport abstraction.
//!
//! The adapter never talks to the network itself. It hands a fully built
//! [`OutboundMessage`] to an injected [`Transport`], which performs the
//! exchange and must fail with [`AdapterError::Cancelled`] once the attached
//! signal fires.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AdapterError, Result};
use crate::types::{OutboundMessage, Response};

const ABORTED: &str = "The operation was aborted";

/// Wire transport for outbound messages.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, message: &OutboundMessage) -> Result<Response> {
        (**self).send(message).await
    }
}

/// Default transport backed by `reqwest`.
///
/// Notes:
/// - Messages must carry an absolute URL; configure a host on the adapter
///   or rewrite in `build_server_url`.
/// - `mode`/`credentials` are browser concepts and are ignored here.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxy, TLS, pool settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Response> {
        if message.is_cancelled() {
            return Err(AdapterError::cancelled(ABORTED));
        }

        let mut builder = self
            .client
            .request(message.method.clone(), &message.url)
            .headers(message.headers.clone());
        if let Some(body) = &message.body {
            builder = builder.body(body.clone());
        }

        let exchange = async {
            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let headers = resp.headers().clone();
            let body = resp.bytes().await?;
            Ok::<_, AdapterError>(Response::new(status, headers, body.to_vec()))
        };

        match &message.signal {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => Err(AdapterError::cancelled(ABORTED)),
                result = exchange => result,
            },
            None => exchange.await,
        }
    }
}

/// A transport decorator that logs every exchange through `tracing`
/// (no bodies, no header values).
#[derive(Debug, Clone, Default)]
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn send(&self, message: &OutboundMessage) -> Result<Response> {
        tracing::debug!(target: "fetch_adapter::http", method=%message.method, url=%message.url, has_signal=message.signal.is_some(), "sending request");
        match self.inner.send(message).await {
            Ok(response) => {
                tracing::debug!(target: "fetch_adapter::http", url=%message.url, status=response.status(), "response received");
                Ok(response)
            }
            Err(error) => {
                tracing::debug!(target: "fetch_adapter::http", url=%message.url, err=%error, "request error");
                Err(error)
            }
        }
    }
}

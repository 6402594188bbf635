//! Fetch entry points and the default adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Adapter, DispatchOptions};
use crate::builder::RequestBuilder;
use crate::error::Result;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::response::{Normalizer, ResponseProxy};
use crate::types::{AdapterConfig, Params, Response, ResponseMeta};

/// Start one request lifecycle.
///
/// Nothing runs until the returned proxy is awaited or read. Timeout
/// precedence is `options.timeout`, then `params.timeout`, then the
/// adapter default.
pub fn fetch<A: Adapter>(adapter: &Arc<A>, params: Params, options: DispatchOptions) -> ResponseProxy {
    let params = Arc::new(params);

    let normalize: Normalizer = {
        let adapter = Arc::clone(adapter);
        let params = Arc::clone(&params);
        Arc::new(move |body: Value, meta: &ResponseMeta| {
            adapter.normalize(&params, body, meta)
        })
    };

    let adapter = Arc::clone(adapter);
    let pending = async move { execute(adapter.as_ref(), &params, options).await };

    ResponseProxy::new(pending, normalize)
}

/// Object-safe fetch capability handed to request builders.
pub trait Fetch: Send + Sync {
    fn fetch(&self, params: Params, options: DispatchOptions) -> ResponseProxy;
}

struct AdapterFetcher<A>(Arc<A>);

impl<A: Adapter> Fetch for AdapterFetcher<A> {
    fn fetch(&self, params: Params, options: DispatchOptions) -> ResponseProxy {
        fetch(&self.0, params, options)
    }
}

/// Entry points available on any shared adapter.
pub trait AdapterExt {
    /// See [`fetch`].
    fn fetch(&self, params: Params, options: DispatchOptions) -> ResponseProxy;

    /// Empty request builder bound to this adapter.
    fn request(&self) -> RequestBuilder;

    /// Request builder with its URL preset.
    fn url(&self, url: impl Into<String>) -> RequestBuilder {
        self.request().url(url)
    }
}

impl<A: Adapter> AdapterExt for Arc<A> {
    fn fetch(&self, params: Params, options: DispatchOptions) -> ResponseProxy {
        fetch(self, params, options)
    }

    fn request(&self) -> RequestBuilder {
        RequestBuilder::new(Arc::new(AdapterFetcher(Arc::clone(self))))
    }
}

/// Adapter with every stage left at its default.
///
/// # Example
/// ```rust,no_run
/// use fetch_adapter::prelude::*;
///
/// # async fn run() -> Result<(), AdapterError> {
/// let adapter = FetchAdapter::reqwest(
///     AdapterConfig::builder().host("https://api.example.com").build(),
/// )
/// .into_shared();
///
/// let post = adapter.url("posts/1").get().json().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FetchAdapter {
    config: AdapterConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FetchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FetchAdapter {
    pub fn new(config: AdapterConfig, transport: impl Transport + 'static) -> Self {
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: AdapterConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Adapter over a default [`ReqwestTransport`].
    pub fn reqwest(config: AdapterConfig) -> Self {
        Self::new(config, ReqwestTransport::new())
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Adapter for FetchAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

async fn execute<A: Adapter>(
    adapter: &A,
    params: &Params,
    options: DispatchOptions,
) -> Result<Response> {
    let options = options.or_timeout(params.timeout);
    let message = adapter.build_request(params).await?;
    adapter.dispatch(message, &options).await
}

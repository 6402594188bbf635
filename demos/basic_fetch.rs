//! Basic Fetch Example
//!
//! Talks to a public JSON API through the default reqwest transport:
//! a cached GET, a JSON POST, a custom adapter that unwraps responses and a
//! request that times out.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=fetch_adapter=debug cargo run --example basic_fetch
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fetch_adapter::prelude::*;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const HOST: &str = "https://jsonplaceholder.typicode.com";

/// Returns only the `title` field of successful responses.
struct Titles {
    config: AdapterConfig,
    transport: ReqwestTransport,
}

#[async_trait]
impl Adapter for Titles {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn transport(&self) -> &dyn Transport {
        &self.transport
    }

    fn normalize_success(&self, _params: &Params, body: Value, _meta: &ResponseMeta) -> Value {
        body.get("title").cloned().unwrap_or(body)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let adapter = FetchAdapter::reqwest(
        AdapterConfig::builder()
            .host(HOST)
            .header("accept", "application/json")
            .timeout(Duration::from_secs(10))
            .cache(Cache::new(LruBucket::new(32)?))
            .build(),
    )
    .into_shared();

    // 1. GET, then the same GET again (served from cache)
    let todo = adapter.url("todos/1").get().json().await?;
    println!("todo: {todo}");
    let again = adapter.url("todos/1").get().json().await?;
    println!("cached: {again}");

    // 2. POST with a JSON body
    let created = adapter
        .url("posts")
        .json(&json!({"title": "fetch-adapter", "userId": 1}))
        .post()
        .json()
        .await?;
    println!("created: {created}");

    // 3. Non-success statuses become NetworkError when the body is read
    match adapter.url("posts/does-not-exist").get().json().await {
        Ok(body) => println!("unexpected body: {body}"),
        Err(AdapterError::Network(err)) => println!("network error: {err}"),
        Err(err) => println!("other error: {err}"),
    }

    // 4. Custom normalization
    let titles = Arc::new(Titles {
        config: AdapterConfig::builder().host(HOST).build(),
        transport: ReqwestTransport::new(),
    });
    let title = titles.url("posts/1").get().text().await?;
    println!("title: {title}");

    // 5. A timeout short enough to fire
    let err = adapter
        .url("photos")
        .cache(false)
        .timeout(Duration::from_millis(1))
        .get()
        .wait()
        .await
        .err();
    println!("timed out: {:?}", err.map(|e| e.is_cancellation()));

    Ok(())
}

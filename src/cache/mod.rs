//! Response cache
//!
//! Adds HTTP policy on top of a pluggable [`CacheBucket`]:
//! - only GET requests are cacheable
//! - only successful responses are stored
//! - keys are derived from the message (resolved URL by default) and an empty
//!   key is a hard error on write

pub mod bucket;
pub mod lru_bucket;

use std::sync::Arc;

use reqwest::Method;

pub use bucket::{CacheBucket, InMemoryBucket};
pub use lru_bucket::LruBucket;

use crate::error::{AdapterError, Result};
use crate::types::{OutboundMessage, Response};

/// Custom cache-key derivation.
pub type CacheKeyFn = Arc<dyn Fn(&OutboundMessage) -> String + Send + Sync>;

/// HTTP-aware cache over a storage bucket.
#[derive(Clone)]
pub struct Cache {
    bucket: Arc<dyn CacheBucket>,
    key_fn: Option<CacheKeyFn>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("custom_key", &self.key_fn.is_some())
            .finish()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(InMemoryBucket::new())
    }
}

impl Cache {
    pub fn new(bucket: impl CacheBucket + 'static) -> Self {
        Self::with_bucket(Arc::new(bucket))
    }

    /// Share a bucket between several caches or adapters.
    pub fn with_bucket(bucket: Arc<dyn CacheBucket>) -> Self {
        Self {
            bucket,
            key_fn: None,
        }
    }

    /// Override key derivation (default: the resolved URL).
    pub fn with_key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&OutboundMessage) -> String + Send + Sync + 'static,
    {
        self.key_fn = Some(Arc::new(key_fn));
        self
    }

    pub fn cache_key(&self, message: &OutboundMessage) -> String {
        match &self.key_fn {
            Some(key_fn) => key_fn(message),
            None => message.url.clone(),
        }
    }

    /// GET requests only; `enabled` is the caller's per-call switch.
    pub fn should_cache(&self, message: &OutboundMessage, enabled: bool) -> bool {
        enabled && message.method == Method::GET
    }

    /// Look up a stored response for `message`; a hit is an independent copy.
    pub async fn match_request(&self, message: &OutboundMessage) -> Result<Option<Response>> {
        self.get(message).await
    }

    /// Store `response` if it is successful. Returns whether it was stored.
    pub async fn put(&self, message: &OutboundMessage, response: &Response) -> Result<bool> {
        if !response.ok() {
            tracing::warn!(target: "fetch_adapter::cache", url=%message.url, status=response.status(), "not caching unsuccessful response");
            return Ok(false);
        }
        self.set(message, response).await?;
        Ok(true)
    }

    pub async fn get(&self, message: &OutboundMessage) -> Result<Option<Response>> {
        let key = self.cache_key(message);
        self.bucket.get(&key).await
    }

    pub async fn set(&self, message: &OutboundMessage, response: &Response) -> Result<()> {
        let key = self.cache_key(message);
        if key.is_empty() {
            return Err(AdapterError::CacheKey(format!(
                "empty cache key for {} {}",
                message.method, message.url
            )));
        }
        self.bucket.set(&key, response.clone()).await
    }

    pub async fn delete(&self, message: &OutboundMessage) -> Result<()> {
        let key = self.cache_key(message);
        self.bucket.delete(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use serde_json::json;

    fn get(url: &str) -> OutboundMessage {
        OutboundMessage::new(Method::GET, url)
    }

    #[test]
    fn only_enabled_get_requests_are_cacheable() {
        let cache = Cache::default();
        assert!(cache.should_cache(&get("/posts"), true));
        assert!(!cache.should_cache(&get("/posts"), false));
        assert!(!cache.should_cache(&OutboundMessage::new(Method::POST, "/posts"), true));
        assert!(!cache.should_cache(&OutboundMessage::new(Method::HEAD, "/posts"), true));
    }

    #[tokio::test]
    async fn put_then_match_returns_equal_copy() {
        let cache = Cache::default();
        let message = get("/posts");
        let response = Response::json_body(200, &json!([{"id": 1}]));

        assert!(cache.put(&message, &response).await.unwrap());
        let hit = cache.match_request(&message).await.unwrap().unwrap();
        assert_eq!(hit, response);
        assert_ne!(hit.body().as_ptr(), response.body().as_ptr());
    }

    #[tokio::test]
    async fn unsuccessful_responses_are_not_stored() {
        let cache = Cache::default();
        let message = get("/missing");
        let stored = cache
            .put(&message, &Response::new(404, HeaderMap::new(), "nope"))
            .await
            .unwrap();

        assert!(!stored);
        assert!(cache.match_request(&message).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_key_fails_loudly() {
        let cache = Cache::default().with_key_fn(|_| String::new());
        let err = cache
            .put(&get("/posts"), &Response::new(200, HeaderMap::new(), "ok"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::CacheKey(_)));
    }

    #[tokio::test]
    async fn custom_key_and_delete() {
        let cache = Cache::default().with_key_fn(|m| format!("{}:{}", m.method, m.url));
        let message = get("/posts");
        assert_eq!(cache.cache_key(&message), "GET:/posts");

        cache
            .set(&message, &Response::new(200, HeaderMap::new(), "ok"))
            .await
            .unwrap();
        cache.delete(&message).await.unwrap();
        assert!(cache.get(&message).await.unwrap().is_none());
    }
}

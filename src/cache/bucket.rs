//! Storage backends for the response cache.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::types::Response;

/// Key/value storage for cached responses.
///
/// Implementations own their entries: `set` receives an independent copy
/// and `get` must hand out a fresh copy, never a shared handle.
#[async_trait]
pub trait CacheBucket: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Response>>;
    async fn set(&self, key: &str, response: Response) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Unbounded in-process bucket. Concurrent writes to one key are
/// last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryBucket {
    map: RwLock<HashMap<String, Response>>,
}

impl InMemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.map.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.map.read().await.is_empty()
    }
}

#[async_trait]
impl CacheBucket for InMemoryBucket {
    async fn get(&self, key: &str) -> Result<Option<Response>> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, response: Response) -> Result<()> {
        self.map.write().await.insert(key.to_string(), response);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.map.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;

    #[tokio::test]
    async fn get_returns_independent_copy() {
        let bucket = InMemoryBucket::new();
        bucket
            .set("/posts", Response::new(200, HeaderMap::new(), "body"))
            .await
            .unwrap();

        let first = bucket.get("/posts").await.unwrap().unwrap();
        let second = bucket.get("/posts").await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_ne!(first.body().as_ptr(), second.body().as_ptr());
    }

    #[test]
    fn delete_and_overwrite() {
        tokio_test::block_on(async {
            let bucket = InMemoryBucket::new();
            tokio_test::assert_ok!(bucket.set("k", Response::new(200, HeaderMap::new(), "a")).await);
            tokio_test::assert_ok!(bucket.set("k", Response::new(200, HeaderMap::new(), "b")).await);
            assert_eq!(bucket.len().await, 1);
            let stored = tokio_test::assert_ok!(bucket.get("k").await);
            assert_eq!(stored.map(Response::text).as_deref(), Some("b"));

            tokio_test::assert_ok!(bucket.delete("k").await);
            assert!(tokio_test::assert_ok!(bucket.get("k").await).is_none());
            assert!(bucket.is_empty().await);
        });
    }
}

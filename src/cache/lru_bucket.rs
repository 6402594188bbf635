//! Bounded LRU bucket with optional time-to-live.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::bucket::CacheBucket;
use crate::error::{AdapterError, Result};
use crate::types::Response;

/// Default capacity when none is given.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
struct CacheEntry {
    response: Response,
    stored_at: Instant,
}

impl CacheEntry {
    fn new(response: Response) -> Self {
        Self {
            response,
            stored_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.stored_at.elapsed() >= ttl)
    }
}

/// Bucket that evicts the least recently used entry once `capacity` is
/// reached. Expired entries read as absent and are dropped on access.
#[derive(Debug)]
pub struct LruBucket {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Option<Duration>,
}

impl LruBucket {
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            AdapterError::Configuration("LRU bucket capacity must be > 0".into())
        })?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: None,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for LruBucket {
    fn default() -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl: None,
        }
    }
}

#[async_trait]
impl CacheBucket for LruBucket {
    async fn get(&self, key: &str) -> Result<Option<Response>> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key) {
            if !entry.is_expired(self.ttl) {
                return Ok(Some(entry.response.clone()));
            }
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, response: Response) -> Result<()> {
        self.entries
            .lock()
            .await
            .put(key.to_string(), CacheEntry::new(response));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.pop(key);
        Ok(())
    }
}

//! Adapter configuration types.
//!
//! This module defines `AdapterConfig` and its builder, the configuration
//! surface shared by every adapter: URL resolution base, default headers,
//! default timeout and the optional cache layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::Cache;

/// Adapter configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Scheme and authority prepended to relative paths, e.g. `https://example.com`
    #[serde(default)]
    pub host: Option<String>,
    /// Path prefix placed between host and request path, e.g. `api/v1`
    #[serde(default)]
    pub namespace: Option<String>,
    /// Timeout applied when a call does not supply its own (seconds on the wire)
    #[serde(default, with = "duration_secs_option_serde")]
    pub timeout: Option<Duration>,
    /// Default headers, overridden per request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response cache; caching is disabled when absent
    #[serde(skip)]
    pub cache: Option<Arc<Cache>>,
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("host", &self.host)
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers.len())
            .field("has_cache", &self.cache.is_some())
            .finish()
    }
}

impl AdapterConfig {
    /// Returns a builder for constructing `AdapterConfig`
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::new()
    }
}

/// Builder for `AdapterConfig`
#[derive(Debug, Clone, Default)]
pub struct AdapterConfigBuilder {
    config: AdapterConfig,
}

impl AdapterConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = Some(host.into());
        self
    }
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.config.namespace = Some(namespace.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.config.headers.extend(headers);
        self
    }
    pub fn cache(mut self, cache: Cache) -> Self {
        self.config.cache = Some(Arc::new(cache));
        self
    }
    pub fn shared_cache(mut self, cache: Arc<Cache>) -> Self {
        self.config.cache = Some(cache);
        self
    }

    /// Build the configuration
    pub fn build(self) -> AdapterConfig {
        self.config
    }
}

// Timeouts travel as (possibly fractional) seconds.
mod duration_secs_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs_f64().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<f64> = Option::deserialize(deserializer)?;
        secs.map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|e| serde::de::Error::custom(e.to_string()))
        })
        .transpose()
    }
}

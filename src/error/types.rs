//! Core error types for the request adapter.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::ResponseMeta;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// A non-success response reified into an error.
///
/// Built lazily, only when the caller reads the body of an unsuccessful
/// response through a [`ResponseProxy`](crate::ResponseProxy) accessor.
#[derive(Debug, Clone)]
pub struct NetworkError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Normalized error body, `None` when the body could not be deserialized.
    pub body: Option<serde_json::Value>,
    /// The response head (status, status text, headers).
    pub response: ResponseMeta,
}

impl NetworkError {
    /// Response headers as a plain map (lowercased names).
    pub fn headers(&self) -> HashMap<String, String> {
        crate::http::headers::headermap_to_hashmap(&self.response.headers)
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.response.status_text)
    }
}

/// Errors surfaced by the adapter pipeline, the cache and the transport.
#[derive(Error, Debug, Clone)]
pub enum AdapterError {
    /// The request is malformed, e.g. a GET/HEAD request carrying a body.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A header name or value could not be represented on the wire.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A cache write was attempted with an empty derived key.
    #[error("Invalid cache key: {0}")]
    CacheKey(String),

    /// The transport returned a non-success status.
    #[error("NetworkError: {0}")]
    Network(Box<NetworkError>),

    /// The effective cancellation signal fired (timeout or external).
    #[error("Request aborted: {0}")]
    Cancelled(String),

    /// The transport failed before producing a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A body could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(String),

    /// Adapter configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdapterError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a cancellation error.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Reify a non-success response.
    pub fn network(
        status: u16,
        body: Option<serde_json::Value>,
        response: ResponseMeta,
    ) -> Self {
        Self::Network(Box::new(NetworkError {
            status,
            body,
            response,
        }))
    }

    /// True for cancellation-kind failures (timeout or caller abort).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// True for failures raised before any transport interaction.
    pub fn is_early_failure(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidHeader(_) | Self::CacheKey(_)
        )
    }

    /// Status code carried by a network error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(err) => Some(err.status),
            _ => None,
        }
    }

    /// Borrow the structured network error, if this is one.
    pub fn as_network(&self) -> Option<&NetworkError> {
        match self {
            Self::Network(err) => Some(err),
            _ => None,
        }
    }
}

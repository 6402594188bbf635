//! Type Conversions for AdapterError
//!
//! This module contains From trait implementations for converting
//! common error types into AdapterError.

use super::types::AdapterError;

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for AdapterError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for AdapterError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AdapterError = json_err.into();
        assert!(matches!(err, AdapterError::Json(_)));
    }

    #[test]
    fn test_from_invalid_header_name() {
        let header_err = reqwest::header::HeaderName::from_bytes(b"bad header").unwrap_err();
        let err: AdapterError = header_err.into();
        assert!(matches!(err, AdapterError::InvalidHeader(_)));
    }
}

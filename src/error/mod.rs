//! Error Handling Module
//!
//! This module provides the error taxonomy for the adapter, including:
//! - Core error type (`AdapterError`) and the structured `NetworkError`
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use fetch_adapter::error::AdapterError;
//!
//! let error = AdapterError::validation("GET request with body");
//! assert!(error.is_early_failure());
//! assert!(!error.is_cancellation());
//! ```

mod conversions;
pub mod types;

pub use types::*;

//! HTTP Utilities
//!
//! This module contains HTTP-related utilities:
//! - Header conversion and merging
//! - URL resolution and query serialization
//! - The injectable transport

pub mod headers;
pub mod transport;
pub mod url;

pub use headers::{DEFAULT_CONTENT_TYPE, headermap_to_hashmap, merge_headers, to_header_map};
pub use transport::{LoggingTransport, ReqwestTransport, Transport};
pub use url::{add_query_params, is_absolute_url, resolve_url, serialize_query};

//! fetch-adapter
//!
//! Declarative HTTP request adapter: describe a request as [`Params`], let an
//! [`Adapter`] turn it into a wire message through overridable hooks, and
//! dispatch it through an injected [`Transport`] with timeout/cancellation
//! reconciliation, optional response caching and lazy body normalization.
//!
//! ```rust,no_run
//! use fetch_adapter::prelude::*;
//!
//! # async fn run() -> Result<(), AdapterError> {
//! let adapter = FetchAdapter::reqwest(
//!     AdapterConfig::builder()
//!         .host("https://jsonplaceholder.typicode.com")
//!         .cache(Cache::default())
//!         .build(),
//! )
//! .into_shared();
//!
//! let todo = adapter.url("todos/1").get().json().await?;
//! let created = adapter
//!     .url("posts")
//!     .json(&serde_json::json!({"title": "hello"}))
//!     .post()
//!     .json()
//!     .await?;
//! # let _ = (todo, created);
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod adapter;
pub mod builder;
pub mod cache;
pub mod cancel;
pub mod error;
pub mod http;
pub mod response;
pub mod types;

pub use adapter::{Adapter, AdapterExt, DispatchOptions, Fetch, FetchAdapter, fetch};
pub use builder::RequestBuilder;
pub use cache::{Cache, CacheBucket, InMemoryBucket, LruBucket};
pub use error::{AdapterError, NetworkError, Result};
pub use http::{LoggingTransport, ReqwestTransport, Transport};
pub use response::{ResponseProxy, ResponseView};
pub use types::{
    AdapterConfig, Body, Credentials, OutboundMessage, Params, RequestMode, RequestOptions,
    Response, ResponseMeta,
};

/// Common imports for adapter users and implementors.
pub mod prelude {
    pub use crate::adapter::{Adapter, AdapterExt, DispatchOptions, FetchAdapter};
    pub use crate::builder::RequestBuilder;
    pub use crate::cache::{Cache, InMemoryBucket, LruBucket};
    pub use crate::error::{AdapterError, NetworkError};
    pub use crate::http::{ReqwestTransport, Transport};
    pub use crate::response::{ResponseProxy, ResponseView};
    pub use crate::types::{AdapterConfig, Body, OutboundMessage, Params, Response, ResponseMeta};
}

//! Core data types: request params, outbound messages, responses and
//! adapter configuration.

pub mod config;
pub mod message;
pub mod params;
pub mod response;

pub use config::{AdapterConfig, AdapterConfigBuilder};
pub use message::OutboundMessage;
pub use params::{Body, Credentials, FetchPolicy, Params, RequestMode, RequestOptions};
pub use response::{NO_CONTENT, Response, ResponseMeta};

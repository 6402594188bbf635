//! Inbound response types.

use std::collections::HashMap;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http::headers::headermap_to_hashmap;

/// Status `204 No Content`.
pub const NO_CONTENT: u16 = 204;

/// Body-less view of a response, handed to normalization hooks and kept on
/// [`NetworkError`](crate::error::NetworkError).
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub fn new(status: u16, headers: HeaderMap) -> Self {
        Self {
            ok: is_success(status),
            status,
            status_text: status_text(status),
            headers,
        }
    }

    /// Header map with lowercased names.
    pub fn header_map(&self) -> HashMap<String, String> {
        headermap_to_hashmap(&self.headers)
    }
}

/// A response produced by a transport or served from the cache.
///
/// The body readers consume the response: each logical read happens at
/// most once. `clone()` produces an independent copy with its own body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    status_text: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text(status),
            headers,
            body: body.into(),
        }
    }

    /// Convenience constructor for a JSON response.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        Self::new(status, headers, body.to_string())
    }

    /// True for 2xx statuses.
    pub fn ok(&self) -> bool {
        is_success(self.status)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Borrow the raw body without consuming it.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            ok: self.ok(),
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
        }
    }

    /// Split into head and raw body.
    pub fn into_parts(self) -> (ResponseMeta, Vec<u8>) {
        let meta = self.meta();
        (meta, self.body)
    }

    pub fn bytes(self) -> Vec<u8> {
        self.body
    }

    /// Read the body as UTF-8 text (lossy).
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn status_text(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

//! HTTP Headers Utility
//!
//! Conversions between plain string maps (what params and config carry) and
//! `HeaderMap` (what goes on the wire).

use std::collections::HashMap;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::AdapterError;

/// Content type injected when a body is present and none was given.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Merge per-request headers over defaults (per-request wins).
///
/// Names are compared case-insensitively, the way `HeaderMap` compares them,
/// so `Accept` on the request replaces `accept` from the defaults. Names
/// within one map that differ only in case are applied in sorted order, so
/// the lowercase spelling wins.
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    request: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = HashMap::with_capacity(defaults.len() + request.len());
    for source in [defaults, request] {
        let mut entries: Vec<_> = source.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (name, value) in entries {
            merged.retain(|existing: &String, _| !existing.eq_ignore_ascii_case(name));
            merged.insert(name.clone(), value.clone());
        }
    }
    merged
}

/// Build a `HeaderMap`, failing on names or values that cannot be sent.
pub fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, AdapterError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            AdapterError::InvalidHeader(format!("Invalid header name '{key}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            AdapterError::InvalidHeader(format!("Invalid header value for '{key}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Set the default JSON content type unless one is already present.
pub fn ensure_content_type(headers: &mut HeaderMap) {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }
}

/// Convert reqwest HeaderMap to HashMap<String, String>
///
/// Invalid UTF-8 header values are filtered out.
pub fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|v_str| (k.as_str().to_string(), v_str.to_string()))
        })
        .collect()
}

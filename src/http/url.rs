//! URL resolution and query-string serialization.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(//|[A-Za-z][A-Za-z0-9+.\-]*://)").expect("absolute url pattern is valid")
});

/// Scheme-prefixed (`https://...`) or protocol-relative (`//...`) URL.
pub fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_URL.is_match(url)
}

/// Resolve `path` against an optional host and namespace.
///
/// Absolute URLs pass through untouched. Otherwise host, namespace and path
/// are joined with single slashes, empty segments are dropped, and a
/// leading slash is forced when there is no host. A host of `/` counts as no
/// host. Query string, fragment and a trailing slash on `path` are kept.
pub fn resolve_url(host: Option<&str>, namespace: Option<&str>, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }

    let (path, suffix) = match path.find(['?', '#']) {
        Some(idx) => path.split_at(idx),
        None => (path, ""),
    };
    let trailing_slash = path.len() > 1 && path.ends_with('/');

    let segments: Vec<&str> = namespace
        .unwrap_or_default()
        .split('/')
        .chain(path.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();

    let mut url = host
        .map(|host| host.trim_end_matches('/'))
        .unwrap_or_default()
        .to_string();
    url.push('/');
    url.push_str(&segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        url.push('/');
    }
    url.push_str(suffix);
    url
}

/// Append serialized query parameters, using `&` when the URL already has a
/// query string. An empty mapping leaves the URL unchanged.
pub fn add_query_params(url: &str, query: &Map<String, Value>) -> String {
    let serialized = serialize_query(query);
    if serialized.is_empty() {
        return url.to_string();
    }
    let delimiter = if url.contains('?') { '&' } else { '?' };
    format!("{url}{delimiter}{serialized}")
}

/// Serialize a JSON object the way jQuery's `param` does: nested objects as
/// `key[sub]`, scalar arrays as `key[]`, compound array items as `key[i]`.
pub fn serialize_query(query: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in query {
        build_pairs(key, value, &mut pairs);
    }
    pairs.join("&")
}

fn build_pairs(prefix: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    build_pairs(&format!("{prefix}[{idx}]"), item, out);
                } else {
                    build_pairs(&format!("{prefix}[]"), item, out);
                }
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                build_pairs(&format!("{prefix}[{key}]"), item, out);
            }
        }
        Value::Null => out.push(format!("{}=", encode(prefix))),
        Value::String(s) => out.push(format!("{}={}", encode(prefix), encode(s))),
        scalar => out.push(format!("{}={}", encode(prefix), encode(&scalar.to_string()))),
    }
}

fn encode(raw: &str) -> String {
    urlencoding::encode(raw).replace("%20", "+")
}

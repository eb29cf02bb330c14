//! Fetch results.

use std::time::Duration;
use axum::http::{HeaderMap, StatusCode, Version};
use bytes::Bytes;

/// A completed upstream fetch.
///
/// Only the multiplexer creates these; consumers read them.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL the fragment was fetched from.
    pub url: String,
    /// Time from sending the request until the full body was read.
    pub duration: Duration,
    pub status: StatusCode,
    pub version: Version,
    /// Response headers. Content-Encoding and Content-Length are dropped
    /// when the body was decompressed.
    pub headers: HeaderMap,
    /// Body bytes, already gunzipped when the upstream sent gzip.
    pub body: Bytes,
}

impl FetchResult {
    /// A response header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

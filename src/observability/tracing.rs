//! Spans for fetch operations.
//!
//! # Responsibilities
//! - Create the `fetch_urls` span for each aggregate call
//! - Create a `fetch_url` span per fragment, tagged with URL and metadata
//!
//! # Design Decisions
//! - Exporting spans is left to whatever subscriber the process installs
//! - Metadata keys are dynamic, so they are recorded as one debug field

use std::collections::BTreeMap;
use tracing::Span;

pub fn multiplex_span(fragments: usize) -> Span {
    tracing::info_span!("fetch_urls", fragments)
}

pub fn fetch_span(url: &str, metadata: &BTreeMap<String, String>) -> Span {
    tracing::info_span!("fetch_url", url = %url, metadata = ?metadata)
}

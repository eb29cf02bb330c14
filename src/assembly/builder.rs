//! Page assembly from fetched results.
//!
//! # Responsibilities
//! - Copy layout headers onto the response, minus an ignore set
//! - Concatenate fragment bodies in order
//! - Fill the layout's content and title placeholders
//!
//! # Design Decisions
//! - Purely synchronous; operates on bytes that were already fetched
//! - Content-Length is always ignored since substitution changes the length
//! - The last fragment that sets a title wins

use std::collections::HashSet;
use axum::body::Body;
use axum::http::header::{self, InvalidHeaderName};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::Response;
use bytes::{Bytes, BytesMut};

use crate::assembly::template::{substitute, CONTENT_PLACEHOLDER, TITLE_PLACEHOLDER};
use crate::config::ResponseConfig;
use crate::multiplexer::FetchResult;

/// Fragment response header that overrides the page title.
pub const X_VIEW_PROXY_TITLE: HeaderName = HeaderName::from_static("x-view-proxy-title");

/// Layout headers that are never forwarded. Names compare case-insensitively.
#[derive(Debug, Clone)]
pub struct IgnoreHeaders(HashSet<HeaderName>);

impl IgnoreHeaders {
    pub fn new() -> Self {
        Self(HashSet::from([header::CONTENT_LENGTH]))
    }

    pub fn insert(&mut self, name: &str) -> Result<(), InvalidHeaderName> {
        self.0.insert(HeaderName::from_bytes(name.as_bytes())?);
        Ok(())
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.0.contains(name)
    }
}

impl Default for IgnoreHeaders {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings shared by every assembled response.
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub default_title: String,
    pub content_placeholder: String,
    pub title_placeholder: String,
    pub ignore_headers: IgnoreHeaders,
}

impl AssemblyOptions {
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
            content_placeholder: CONTENT_PLACEHOLDER.to_string(),
            title_placeholder: TITLE_PLACEHOLDER.to_string(),
            ignore_headers: IgnoreHeaders::new(),
        }
    }

    pub fn from_config(config: &ResponseConfig) -> Self {
        let mut options = Self::new(config.default_page_title.clone());
        options.content_placeholder = config.content_placeholder.clone();
        options.title_placeholder = config.title_placeholder.clone();

        for name in &config.ignore_headers {
            if let Err(e) = options.ignore_headers.insert(name) {
                tracing::warn!(header = %name, error = %e, "Skipping invalid ignored header");
            }
        }
        options
    }

    /// Also drop `name` from layout headers.
    pub fn ignore_header(mut self, name: &str) -> Result<Self, InvalidHeaderName> {
        self.ignore_headers.insert(name)?;
        Ok(self)
    }
}

/// The title set by the last fragment carrying a non-empty title header.
pub fn resolve_title<'a>(fragments: &'a [FetchResult], default_title: &'a str) -> &'a str {
    fragments
        .iter()
        .filter_map(|fragment| fragment.header(X_VIEW_PROXY_TITLE.as_str()))
        .filter(|title| !title.is_empty())
        .last()
        .unwrap_or(default_title)
}

/// Builds the outbound response for one page.
#[derive(Debug)]
pub struct ResponseBuilder<'a> {
    options: &'a AssemblyOptions,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(options: &'a AssemblyOptions) -> Self {
        Self {
            options,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Assemble a page: the layout's headers and body, then the fragments.
    pub fn assemble(options: &'a AssemblyOptions, layout: Option<&FetchResult>, fragments: &[FetchResult]) -> Self {
        let mut builder = Self::new(options);
        if let Some(layout) = layout {
            builder.set_layout(layout);
            builder.set_headers(&layout.headers);
        }
        builder.set_fragments(fragments);
        builder
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_layout(&mut self, layout: &FetchResult) {
        self.body = layout.body.clone();
    }

    /// Copy headers that are not ignored.
    pub fn set_headers(&mut self, headers: &HeaderMap) {
        for (name, value) in headers {
            if !self.options.ignore_headers.contains(name) {
                self.headers.append(name.clone(), value.clone());
            }
        }
    }

    /// Insert fragment bodies into the layout, or use them as the whole body
    /// when there is no layout.
    pub fn set_fragments(&mut self, fragments: &[FetchResult]) {
        let mut content = BytesMut::with_capacity(fragments.iter().map(|f| f.body.len()).sum());
        for fragment in fragments {
            content.extend_from_slice(&fragment.body);
        }

        if self.body.is_empty() {
            self.body = content.freeze();
            return;
        }

        let title = resolve_title(fragments, &self.options.default_title);
        let page = substitute(
            &self.body,
            &[
                (self.options.content_placeholder.as_bytes(), &content[..]),
                (self.options.title_placeholder.as_bytes(), title.as_bytes()),
            ],
        );
        self.body = Bytes::from(page);
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

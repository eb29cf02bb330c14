//! Header manipulation for upstream requests.
//!
//! # Responsibilities
//! - Copy end-to-end headers from the inbound request
//! - Strip hop-by-hop headers, plus any named in `Connection`
//! - Add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//! - Offer only the encodings the multiplexer can decode
//!
//! # Design Decisions
//! - Preserve an existing X-Forwarded-For chain and append the client IP
//! - Host and Content-Length are dropped; the transport derives them
//!   for each upstream request
//! - The client's Accept-Encoding is replaced with `gzip`, since fragment
//!   bodies are spliced as plain bytes

use std::net::SocketAddr;
use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

/// Headers to send upstream on behalf of an inbound request.
pub fn forwarded_headers(inbound: &HeaderMap, client: Option<SocketAddr>) -> HeaderMap {
    let dropped = connection_tokens(inbound);
    let mut forwarded = HeaderMap::with_capacity(inbound.len() + 3);

    for (name, value) in inbound {
        if HOP_BY_HOP.contains(name)
            || dropped.contains(name)
            || name == header::HOST
            || name == header::CONTENT_LENGTH
            || name == header::ACCEPT_ENCODING
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }

    if let Some(addr) = client {
        let ip = addr.ip().to_string();
        let chain = match forwarded.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{}, {}", existing, ip),
            None => ip,
        };
        if let Ok(value) = HeaderValue::from_str(&chain) {
            forwarded.insert(X_FORWARDED_FOR, value);
        }
    }

    if let Some(host) = inbound.get(header::HOST) {
        forwarded.insert(X_FORWARDED_HOST, host.clone());
    }
    forwarded.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    forwarded.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    forwarded
}

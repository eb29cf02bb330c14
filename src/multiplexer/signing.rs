//! HMAC request signing.
//!
//! The upstream verifies `Authorization` by recomputing
//! `hex(HMAC-SHA256(secret, "{path}?{query},{timestamp}"))` and checks
//! `X-Authorization-Time` for freshness. Without a query the `?` is dropped.

use std::time::{SystemTime, UNIX_EPOCH};
use axum::http::header::{InvalidHeaderValue, AUTHORIZATION};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the timestamp that was signed.
pub const X_AUTHORIZATION_TIME: HeaderName = HeaderName::from_static("x-authorization-time");

/// The string that gets signed for `uri` at `timestamp`.
pub fn signing_payload(uri: &Uri, timestamp: u64) -> String {
    match uri.query() {
        Some(query) if !query.is_empty() => format!("{}?{},{}", uri.path(), query, timestamp),
        _ => format!("{},{}", uri.path(), timestamp),
    }
}

/// Why the signature headers could not be built.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid signing key: {0}")]
    Key(InvalidLength),

    #[error("invalid signature header: {0}")]
    Header(#[from] InvalidHeaderValue),
}

impl From<InvalidLength> for SigningError {
    fn from(err: InvalidLength) -> Self {
        SigningError::Key(err)
    }
}

/// Hex-encoded HMAC-SHA256 of `payload`.
pub fn sign(secret: &str, payload: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// A copy of `headers` with the signature headers set for `uri`.
pub fn headers_with_hmac(
    headers: &HeaderMap,
    uri: &Uri,
    secret: &str,
    timestamp: u64,
) -> Result<HeaderMap, SigningError> {
    let mut signed = headers.clone();
    let signature = sign(secret, &signing_payload(uri, timestamp))?;

    signed.insert(AUTHORIZATION, HeaderValue::from_str(&signature)?);
    signed.insert(X_AUTHORIZATION_TIME, HeaderValue::from(timestamp));

    Ok(signed)
}

/// Seconds since the Unix epoch.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

use crate::multiplexer::result::FetchResult;
use crate::multiplexer::transport::TransportError;

/// A non-2xx response received while strict mode was on.
///
/// Carries the full result so callers can inspect what the upstream said.
#[derive(Debug, Error)]
#[error("status code {} received from {}", .result.status, .result.url)]
pub struct ResultError {
    pub result: FetchResult,
}

/// Errors produced by a single fetch or an aggregate fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connecting, sending or reading from the upstream failed.
    #[error("fetch of {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The upstream declared gzip but the body did not decompress.
    #[error("failed to decode gzip body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Strict mode rejected a non-2xx status.
    #[error(transparent)]
    Status(Box<ResultError>),

    /// The overall deadline elapsed before every fetch completed.
    #[error("fetching fragments timed out after {0:?}")]
    Timeout(Duration),

    /// The outbound request could not be built.
    #[error("invalid upstream request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// The caller cancelled the fetch.
    #[error("fetch cancelled")]
    Cancelled,

    /// A fetch task panicked or was aborted from outside.
    #[error("fetch task failed: {0}")]
    TaskFailed(String),
}

impl FetchError {
    /// The upstream result behind a strict-mode status error.
    pub fn result(&self) -> Option<&FetchResult> {
        match self {
            FetchError::Status(err) => Some(&err.result),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

impl From<ResultError> for FetchError {
    fn from(err: ResultError) -> Self {
        FetchError::Status(Box::new(err))
    }
}

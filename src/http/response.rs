//! Error responses.
//!
//! # Responsibilities
//! - Map fetch failures to client-visible status codes
//! - Render the fixed not-found and error bodies
//!
//! # Design Decisions
//! - An upstream 404 stays a 404; every other rejected status is a 502
//! - Transport and decode failures result in 502 Bad Gateway
//! - Deadline expiry results in 504 Gateway Timeout

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::multiplexer::FetchError;

pub fn status_for_error(error: &FetchError) -> StatusCode {
    match error {
        FetchError::Status(err) if err.result.status == StatusCode::NOT_FOUND => StatusCode::NOT_FOUND,
        FetchError::Status(_) | FetchError::Transport { .. } | FetchError::Decode { .. } => StatusCode::BAD_GATEWAY,
        FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        FetchError::InvalidRequest { .. } | FetchError::Cancelled | FetchError::TaskFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Response for paths that match no route.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 not found").into_response()
}

/// Response for a failed page fetch.
pub fn error_response(error: &FetchError) -> Response {
    let status = status_for_error(error);
    let body = match status {
        StatusCode::NOT_FOUND => "404 not found".to_string(),
        _ => format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("error")).to_lowercase(),
    };
    (status, body).into_response()
}

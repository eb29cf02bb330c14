//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Send one fully-buffered request and return a fully-buffered response
//! - Own the connection pool shared by every fetch of a call
//!
//! # Design Decisions
//! - Object safe so test doubles can be injected as `Arc<dyn Transport>`
//! - The hyper-util legacy client never follows redirects, so the first hop
//!   is always what the caller sees
//! - Bodies are capped at `max_body_bytes`

use std::time::Duration;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use bytes::Bytes;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::UpstreamConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Sends requests to the upstream.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;
}

/// Default transport backed by the hyper-util pooled client.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    max_body_bytes: usize,
}

impl HyperTransport {
    pub fn new(connect_timeout: Duration, max_body_bytes: usize) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            max_body_bytes,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(
            Duration::from_millis(config.connect_timeout_ms),
            config.max_body_bytes,
        )
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let response: Response<Incoming> = self
            .client
            .request(request.map(Body::from))
            .await
            .map_err(|e| TransportError::Request(format!("{:?}", e)))?;

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(Response::from_parts(parts, bytes))
    }
}

//! Aggregate fetch requests.
//!
//! # Responsibilities
//! - Collect the ordered fetch targets and options for one page
//! - Launch one task per target and supervise them
//! - Perform a single fetch with the same header, signing and decoding rules
//!
//! # Design Decisions
//! - Every target is spawned up front; there is no concurrency cap
//! - The supervisor races {first failure, all success, deadline, caller
//!   cancel} and the first to resolve decides the outcome
//! - Each task returns its input index and the supervisor writes it into a
//!   pre-sized slot, so duplicate URLs and completion order never matter
//! - On failure or timeout the shared signal fires and the JoinSet is
//!   aborted; late results are discarded

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use axum::http::{HeaderMap, Method, Request, Uri};
use bytes::Bytes;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::config::UpstreamConfig;
use crate::multiplexer::cancel::CancelSignal;
use crate::multiplexer::decode::decode_body;
use crate::multiplexer::error::{FetchError, ResultError};
use crate::multiplexer::result::FetchResult;
use crate::multiplexer::signing::{headers_with_hmac, unix_timestamp};
use crate::multiplexer::transport::Transport;
use crate::observability::{metrics, tracing as spans};
use crate::routing::Fragment;
use crate::security::headers::forwarded_headers;

/// One URL to fetch plus the tags reported on its span.
#[derive(Debug, Clone)]
pub struct FetchTarget {
    pub url: String,
    pub metadata: BTreeMap<String, String>,
}

/// Options shared read-only by every task of a call.
#[derive(Clone)]
struct FetchOptions {
    headers: HeaderMap,
    hmac_secret: Option<String>,
    non_2xx_errors: bool,
    max_body_bytes: usize,
    transport: Arc<dyn Transport>,
}

type TaskOutput = (usize, Result<FetchResult, FetchError>);

/// Everything needed to fetch the fragments of one page.
#[derive(Clone)]
pub struct FetchSpec {
    targets: Vec<FetchTarget>,
    timeout: Duration,
    options: FetchOptions,
}

impl FetchSpec {
    /// A strict spec with a 10 second deadline, an 8 MiB decoded body cap
    /// and no signing.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            targets: Vec::new(),
            timeout: Duration::from_secs(10),
            options: FetchOptions {
                headers: HeaderMap::new(),
                hmac_secret: None,
                non_2xx_errors: true,
                max_body_bytes: 8 * 1024 * 1024,
                transport,
            },
        }
    }

    /// A spec carrying the deadline, secret and strictness from config.
    pub fn from_config(config: &UpstreamConfig, transport: Arc<dyn Transport>) -> Self {
        let mut spec = Self::new(transport)
            .with_timeout(Duration::from_millis(config.timeout_ms))
            .with_non_2xx_errors(config.non_2xx_errors)
            .with_max_body_bytes(config.max_body_bytes);
        spec.options.hmac_secret = config.hmac_secret.clone().filter(|s| !s.is_empty());
        spec
    }

    /// Append a target. Results come back in the order targets were added.
    pub fn with_fragment(mut self, url: impl Into<String>, metadata: BTreeMap<String, String>) -> Self {
        self.targets.push(FetchTarget {
            url: url.into(),
            metadata,
        });
        self
    }

    /// Append a fragment bound to a URL. An unbound fragment is fetched by
    /// its path.
    pub fn with_bound_fragment(self, fragment: &Fragment) -> Self {
        let url = fragment.url.clone().unwrap_or_else(|| fragment.path.clone());
        self.with_fragment(url, fragment.metadata.clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_hmac_secret(mut self, secret: impl Into<String>) -> Self {
        self.options.hmac_secret = Some(secret.into());
        self
    }

    /// When enabled (the default) any status outside 200-299 fails the fetch.
    pub fn with_non_2xx_errors(mut self, enabled: bool) -> Self {
        self.options.non_2xx_errors = enabled;
        self
    }

    /// Largest body accepted after gzip decoding.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.options.max_body_bytes = limit;
        self
    }

    /// Send `headers` on every fetch, in addition to any already set.
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.options.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Forward the end-to-end headers of an inbound request upstream.
    pub fn with_headers_from_request(self, inbound: &HeaderMap, client: Option<SocketAddr>) -> Self {
        let forwarded = forwarded_headers(inbound, client);
        self.with_headers(&forwarded)
    }

    pub fn targets(&self) -> &[FetchTarget] {
        &self.targets
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.options.headers
    }

    /// Fetch every target concurrently.
    ///
    /// Returns all results in target order, or the first error. Never a
    /// partial set.
    pub async fn fetch_all(&self) -> Result<Vec<FetchResult>, FetchError> {
        self.fetch_all_with_cancel(&CancelSignal::new()).await
    }

    /// Like [`fetch_all`](Self::fetch_all), but also gives up when `parent` fires.
    pub async fn fetch_all_with_cancel(&self, parent: &CancelSignal) -> Result<Vec<FetchResult>, FetchError> {
        let span = spans::multiplex_span(self.targets.len());
        self.supervise(parent).instrument(span).await
    }

    async fn supervise(&self, parent: &CancelSignal) -> Result<Vec<FetchResult>, FetchError> {
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.timeout;
        let options = Arc::new(self.options.clone());
        let cancel = CancelSignal::new();

        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
        for (index, target) in self.targets.iter().cloned().enumerate() {
            let options = Arc::clone(&options);
            let cancel = cancel.clone();
            let span = spans::fetch_span(&target.url, &target.metadata);

            tasks.spawn(
                async move {
                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => Err(FetchError::Cancelled),
                        result = options.fetch(Method::GET, &target.url, Bytes::new()) => result,
                    };
                    (index, outcome)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<FetchResult>> = std::iter::repeat_with(|| None)
            .take(self.targets.len())
            .collect();

        let outcome = tokio::select! {
            biased;
            _ = parent.cancelled() => Err(FetchError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => Err(FetchError::Timeout(self.timeout)),
            result = collect(&mut tasks, &mut slots) => result,
        };

        if let Err(error) = outcome {
            cancel.cancel();
            tasks.abort_all();
            tracing::warn!(
                error = %error,
                fragments = self.targets.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Aggregate fetch aborted"
            );
            metrics::record_multiplex(outcome_label(&error), started.elapsed());
            return Err(error);
        }

        let results = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| FetchError::TaskFailed(format!("no result for fragment {}", index)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            fragments = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregate fetch complete"
        );
        metrics::record_multiplex("ok", started.elapsed());
        Ok(results)
    }

    /// Perform exactly one fetch outside the multiplexed path.
    ///
    /// Uses the same headers, signing, strictness and timeout as `fetch_all`.
    pub async fn fetch_single(&self, method: Method, url: &str, body: Bytes) -> Result<FetchResult, FetchError> {
        let span = spans::fetch_span(url, &BTreeMap::new());
        let fetch = self.options.fetch(method, url, body).instrument(span);

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}

async fn collect(tasks: &mut JoinSet<TaskOutput>, slots: &mut [Option<FetchResult>]) -> Result<(), FetchError> {
    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) = joined.map_err(|e| FetchError::TaskFailed(e.to_string()))?;
        slots[index] = Some(outcome?);
    }
    Ok(())
}

fn outcome_label(error: &FetchError) -> &'static str {
    match error {
        FetchError::Timeout(_) => "timeout",
        FetchError::Status(_) => "status",
        FetchError::Cancelled => "cancelled",
        _ => "error",
    }
}

impl FetchOptions {
    async fn fetch(&self, method: Method, url: &str, body: Bytes) -> Result<FetchResult, FetchError> {
        let started = Instant::now();
        let invalid = |reason: String| FetchError::InvalidRequest {
            url: url.to_string(),
            reason,
        };

        let uri: Uri = url.parse().map_err(|e: axum::http::uri::InvalidUri| invalid(e.to_string()))?;
        let headers = match &self.hmac_secret {
            Some(secret) => headers_with_hmac(&self.headers, &uri, secret, unix_timestamp())
                .map_err(|e| invalid(e.to_string()))?,
            None => self.headers.clone(),
        };

        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .map_err(|e| invalid(e.to_string()))?;
        *request.headers_mut() = headers;

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let duration = started.elapsed();

        let (mut parts, raw) = response.into_parts();
        let body = decode_body(&mut parts.headers, raw, self.max_body_bytes).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!(
            url = %url,
            status = parts.status.as_u16(),
            elapsed_ms = duration.as_millis() as u64,
            "Fetched fragment"
        );
        metrics::record_fragment_fetch(parts.status.as_u16(), duration);

        let result = FetchResult {
            url: url.to_string(),
            duration,
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        };

        if self.non_2xx_errors && !result.status.is_success() {
            return Err(ResultError { result }.into());
        }

        Ok(result)
    }
}

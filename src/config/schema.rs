//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the fragment gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream content service settings.
    pub upstream: UpstreamConfig,

    /// Response assembly settings.
    pub response: ResponseConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Route definitions, matched in file order.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3005").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3005".to_string(),
        }
    }
}

/// Upstream content service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL that layouts and fragments are resolved against.
    pub target: String,

    /// Overall deadline for fetching every fragment of one page, in milliseconds.
    pub timeout_ms: u64,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Shared secret used to sign upstream requests. Signing is off when unset.
    pub hmac_secret: Option<String>,

    /// Treat any non-2xx upstream status as a failed fetch.
    pub non_2xx_errors: bool,

    /// Largest upstream body accepted per fragment, in bytes.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target: "http://localhost:3000".to_string(),
            timeout_ms: 10_000,
            connect_timeout_ms: 2_000,
            hmac_secret: None,
            non_2xx_errors: true,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Response assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Title used when no fragment sets `X-View-Proxy-Title`.
    pub default_page_title: String,

    /// Layout response headers never forwarded to the client.
    /// `Content-Length` is always ignored in addition to these.
    pub ignore_headers: Vec<String>,

    /// Token in the layout replaced by the concatenated fragments.
    pub content_placeholder: String,

    /// Token in the layout replaced by the resolved page title.
    pub title_placeholder: String,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            default_page_title: "viewproxy".to_string(),
            ignore_headers: Vec::new(),
            content_placeholder: crate::assembly::template::CONTENT_PLACEHOLDER.to_string(),
            title_placeholder: crate::assembly::template::TITLE_PLACEHOLDER.to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Route configuration mapping a path pattern to a layout and fragments.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern, `:name` segments capture parameters (e.g. "/users/:id").
    pub path: String,

    /// Layout name, fetched from `{target}/layouts/{layout}`.
    #[serde(default)]
    pub layout: Option<String>,

    /// Fragments fetched from `{target}/{path}`, in render order.
    #[serde(default)]
    pub fragments: Vec<FragmentConfig>,
}

/// A fragment reference: either a bare path or a path with tracing metadata.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FragmentConfig {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        metadata: BTreeMap<String, String>,
    },
}

impl FragmentConfig {
    pub fn path(&self) -> &str {
        match self {
            FragmentConfig::Path(path) => path,
            FragmentConfig::Detailed { path, .. } => path,
        }
    }

    pub fn metadata(&self) -> BTreeMap<String, String> {
        match self {
            FragmentConfig::Path(_) => BTreeMap::new(),
            FragmentConfig::Detailed { metadata, .. } => metadata.clone(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_with_ten_second_deadline() {
        let config = GatewayConfig::default();
        assert!(config.upstream.non_2xx_errors);
        assert_eq!(config.upstream.timeout_ms, 10_000);
        assert!(config.upstream.hmac_secret.is_none());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn parses_routes_with_bare_and_detailed_fragments() {
        let raw = r#"
            [upstream]
            target = "http://content.internal:4000"
            hmac_secret = "s3cret"

            [[routes]]
            path = "/users/:id"
            layout = "application"
            fragments = [
                "header",
                { path = "users/show", metadata = { controller = "users" } },
            ]
        "#;

        let config: GatewayConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.upstream.target, "http://content.internal:4000");
        assert_eq!(config.upstream.hmac_secret.as_deref(), Some("s3cret"));
        // Unspecified fields keep their defaults.
        assert_eq!(config.upstream.timeout_ms, 10_000);

        let route = &config.routes[0];
        assert_eq!(route.layout.as_deref(), Some("application"));
        assert_eq!(route.fragments[0], FragmentConfig::Path("header".into()));
        assert_eq!(route.fragments[1].path(), "users/show");
        assert_eq!(
            route.fragments[1].metadata().get("controller").map(String::as_str),
            Some("users")
        );
    }
}

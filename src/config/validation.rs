//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, parseable URLs and header names)
//! - Detect duplicate route patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.target '{value}' is not a valid URL: {reason}")]
    InvalidTarget { value: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("route '{path}' must start with '/'")]
    RelativeRoute { path: String },

    #[error("route '{path}' is declared more than once")]
    DuplicateRoute { path: String },

    #[error("route '{path}' has neither a layout nor fragments")]
    EmptyRoute { path: String },

    #[error("route '{path}' has a parameter segment with no name")]
    UnnamedParameter { path: String },

    #[error("'{name}' is not a valid header name")]
    InvalidHeaderName { name: String },

    #[error("response placeholders must be non-empty and distinct")]
    Placeholders,
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.target) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidTarget {
            value: config.upstream.target.clone(),
            reason: "URL cannot be used as a base".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidTarget {
            value: config.upstream.target.clone(),
            reason: e.to_string(),
        }),
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.timeout_ms" });
    }
    if config.upstream.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.connect_timeout_ms" });
    }
    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.max_body_bytes" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "timeouts.request_secs" });
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativeRoute { path: route.path.clone() });
        }
        if !seen.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicateRoute { path: route.path.clone() });
        }
        if route.layout.is_none() && route.fragments.is_empty() {
            errors.push(ValidationError::EmptyRoute { path: route.path.clone() });
        }
        if route.path.split('/').any(|segment| segment == ":") {
            errors.push(ValidationError::UnnamedParameter { path: route.path.clone() });
        }
    }

    for name in &config.response.ignore_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName { name: name.clone() });
        }
    }

    let response = &config.response;
    if response.content_placeholder.is_empty()
        || response.title_placeholder.is_empty()
        || response.content_placeholder == response.title_placeholder
    {
        errors.push(ValidationError::Placeholders);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FragmentConfig, RouteConfig};

    fn route(path: &str) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            layout: Some("application".to_string()),
            fragments: vec![FragmentConfig::Path("body".to_string())],
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = GatewayConfig::default();
        config.upstream.target = "not a url".to_string();
        config.upstream.timeout_ms = 0;
        config.routes.push(route("users"));
        config.routes.push(route("/a"));
        config.routes.push(route("/a"));
        config.response.ignore_headers.push("bad header".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::InvalidTarget { .. }));
        assert_eq!(errors[1], ValidationError::ZeroValue { field: "upstream.timeout_ms" });
        assert_eq!(errors[2], ValidationError::RelativeRoute { path: "users".into() });
        assert_eq!(errors[3], ValidationError::DuplicateRoute { path: "/a".into() });
        assert_eq!(errors[4], ValidationError::InvalidHeaderName { name: "bad header".into() });
    }

    #[test]
    fn rejects_route_without_content() {
        let mut config = GatewayConfig::default();
        config.routes.push(RouteConfig {
            path: "/empty".into(),
            layout: None,
            fragments: Vec::new(),
        });
        config.routes.push(RouteConfig {
            path: "/users/:".into(),
            layout: Some("application".into()),
            fragments: Vec::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyRoute { path: "/empty".into() },
                ValidationError::UnnamedParameter { path: "/users/:".into() },
            ]
        );
    }

    #[test]
    fn rejects_identical_placeholders() {
        let mut config = GatewayConfig::default();
        config.response.title_placeholder = config.response.content_placeholder.clone();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::Placeholders]));
    }

    #[test]
    fn rejects_zero_connect_timeout() {
        let mut config = GatewayConfig::default();
        config.upstream.connect_timeout_ms = 0;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ZeroValue { field: "upstream.connect_timeout_ms" }])
        );
    }
}

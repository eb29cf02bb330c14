//! Route lookup.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Look up the first route whose pattern matches a path
//! - Return matched route plus captured parameters, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, read without locks)
//! - O(n) scan over routes per lookup (acceptable for typical route counts)
//! - First match wins; there is no scoring between overlapping patterns

use crate::config::RouteConfig;
use crate::routing::fragment::Fragment;
use crate::routing::matcher::{split_path, Params, PathPattern};

/// A path pattern mapped to a layout and an ordered fragment list.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    layout: Option<Fragment>,
    fragments: Vec<Fragment>,
}

impl Route {
    pub fn new(pattern: &str, layout: Option<Fragment>, fragments: Vec<Fragment>) -> Self {
        Self {
            pattern: PathPattern::parse(pattern),
            layout,
            fragments,
        }
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn layout(&self) -> Option<&Fragment> {
        self.layout.as_ref()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Everything to fetch for this route: the layout first, then content
    /// fragments in render order.
    pub fn fragments_to_request(&self) -> Vec<&Fragment> {
        self.layout.iter().chain(self.fragments.iter()).collect()
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

/// The route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configuration, preserving file order.
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let mut router = Self::new();
        for config in configs {
            router.register(
                &config.path,
                config.layout.as_deref().map(Fragment::new),
                config.fragments.iter().map(Fragment::from).collect(),
            );
        }
        router
    }

    /// Append a route. Earlier registrations take precedence.
    pub fn register(&mut self, pattern: &str, layout: Option<Fragment>, fragments: Vec<Fragment>) {
        tracing::debug!(pattern = %pattern, fragments = fragments.len(), "Registering route");
        self.routes.push(Route::new(pattern, layout, fragments));
    }

    /// Find the first route matching `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let parts: Vec<&str> = split_path(path).collect();

        self.routes
            .iter()
            .find(|route| route.pattern.matches(&parts))
            .map(|route| RouteMatch {
                route,
                params: route.pattern.parameters(&parts),
            })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FragmentConfig;

    #[test]
    fn test_match_extracts_parameters() {
        let mut router = Router::new();
        router.register("/hello/:name", Some(Fragment::new("application")), vec![]);

        let matched = router.match_path("/hello/world").unwrap();
        assert_eq!(matched.params.get("name").map(String::as_str), Some("world"));
        assert_eq!(matched.route.pattern().as_str(), "/hello/:name");

        assert!(router.match_path("/hello/world/extra").is_none());
    }

    #[test]
    fn first_registered_route_wins() {
        let mut router = Router::new();
        router.register("/users/:id", None, vec![Fragment::new("users/show")]);
        router.register("/users/new", None, vec![Fragment::new("users/new")]);

        let matched = router.match_path("/users/new").unwrap();
        assert_eq!(matched.route.fragments()[0].path, "users/show");
        assert_eq!(matched.params["id"], "new");
    }

    #[test]
    fn no_routes_means_no_match() {
        assert!(Router::new().match_path("/").is_none());
    }

    #[test]
    fn test_layout_is_requested_first() {
        let route = Route::new(
            "/",
            Some(Fragment::new("my_layout")),
            vec![Fragment::new("header"), Fragment::new("body")],
        );

        let paths: Vec<&str> = route
            .fragments_to_request()
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(paths, ["my_layout", "header", "body"]);
        assert_eq!(route.layout(), Some(&Fragment::new("my_layout")));
    }

    #[test]
    fn from_config_preserves_order_and_metadata() {
        let configs = vec![
            RouteConfig {
                path: "/".into(),
                layout: Some("home".into()),
                fragments: vec![FragmentConfig::Path("index".into())],
            },
            RouteConfig {
                path: "/users/:id".into(),
                layout: None,
                fragments: vec![FragmentConfig::Detailed {
                    path: "users/show".into(),
                    metadata: [("controller".to_string(), "users".to_string())].into(),
                }],
            },
        ];

        let router = Router::from_config(&configs);
        assert_eq!(router.len(), 2);

        let matched = router.match_path("/users/7").unwrap();
        assert!(matched.route.layout().is_none());
        assert_eq!(matched.route.fragments()[0].metadata["controller"], "users");
        assert_eq!(router.match_path("/").unwrap().route.layout().unwrap().path, "home");
    }
}

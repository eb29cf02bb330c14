//! Path segment matching.
//!
//! # Responsibilities
//! - Split patterns and paths into `/`-separated segments
//! - Match literal segments exactly (case-sensitive)
//! - Capture `:name` segments verbatim
//!
//! # Design Decisions
//! - Splitting keeps empty segments, so "/" is two empty segments and a
//!   trailing slash is significant
//! - Segment counts must be equal; there are no wildcards
//! - No regex and no percent-decoding

use std::collections::BTreeMap;

/// Marker that turns a pattern segment into a named parameter.
pub const PARAMETER_MARKER: char = ':';

/// Parameters captured from a matched path, ordered by name.
pub type Params = BTreeMap<String, String>;

/// One segment of a registered path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Matches any path segment and captures it under this name.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PARAMETER_MARKER) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }

    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == part,
            Segment::Param(_) => true,
        }
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            segments: split_path(pattern).map(Segment::parse).collect(),
        }
    }

    /// The pattern as it was registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if every segment of `parts` matches positionally.
    pub fn matches(&self, parts: &[&str]) -> bool {
        self.segments.len() == parts.len()
            && self
                .segments
                .iter()
                .zip(parts)
                .all(|(segment, part)| segment.matches(part))
    }

    /// Extract parameter values from `parts`. Only meaningful after `matches`.
    pub fn parameters(&self, parts: &[&str]) -> Params {
        self.segments
            .iter()
            .zip(parts)
            .filter_map(|(segment, part)| match segment {
                Segment::Param(name) => Some((name.clone(), (*part).to_string())),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// Split a path the same way patterns are split.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(path: &str) -> Vec<&str> {
        split_path(path).collect()
    }

    #[test]
    fn test_pattern_matches() {
        let cases = [
            ("/", "/", true),
            ("/", "/hello-world", false),
            ("/hello/world", "/hello/world", true),
            ("/hello/world", "/hello/false", false),
            ("/hello/:name", "/hello/world", true),
            ("/hello/:name", "/hello/world/wow", false),
            ("/hello/:name", "/hello", false),
            ("/hello", "/hello/", false),
            ("/Hello", "/hello", false),
        ];

        for (pattern, path, want) in cases {
            let got = PathPattern::parse(pattern).matches(&parts(path));
            assert_eq!(got, want, "pattern {} against {}", pattern, path);
        }
    }

    #[test]
    fn test_parameters() {
        let pattern = PathPattern::parse("/hello/:name");
        let params = pattern.parameters(&parts("/hello/world"));
        assert_eq!(params, Params::from([("name".to_string(), "world".to_string())]));

        assert!(PathPattern::parse("/").parameters(&parts("/")).is_empty());
    }

    #[test]
    fn parameter_values_are_not_decoded() {
        let pattern = PathPattern::parse("/search/:query/:page");
        let params = pattern.parameters(&parts("/search/a%20b/2"));
        assert_eq!(params["query"], "a%20b");
        assert_eq!(params["page"], "2");
    }

    #[test]
    fn segments_keep_marker_out_of_name() {
        let pattern = PathPattern::parse("/users/:id");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal(String::new()),
                Segment::Literal("users".into()),
                Segment::Param("id".into()),
            ]
        );
        assert_eq!(pattern.as_str(), "/users/:id");
    }
}

//! Fragment references.

use std::collections::BTreeMap;

use crate::config::FragmentConfig;

/// An addressable unit of content served by the upstream.
///
/// `path` is relative to the upstream target. `url` is only set once the
/// fragment has been bound to a concrete request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub path: String,
    pub url: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl Fragment {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata tag, reported on the fragment's fetch span.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// A copy of this fragment bound to `url`.
    pub fn bind(&self, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..self.clone()
        }
    }
}

impl From<&FragmentConfig> for Fragment {
    fn from(config: &FragmentConfig) -> Self {
        Self {
            path: config.path().to_string(),
            url: None,
            metadata: config.metadata(),
        }
    }
}

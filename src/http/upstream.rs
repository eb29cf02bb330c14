//! Upstream URL construction.
//!
//! Layouts live at `{target}/layouts/{name}` and fragments at
//! `{target}/{path}`. Route parameters become the query string, sorted by
//! name; with no parameters there is no `?` at all.

use url::Url;

use crate::routing::{Fragment, Params, RouteMatch};

#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    base: Url,
}

impl UpstreamTarget {
    pub fn parse(target: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(target)?,
        })
    }

    pub fn layout_url(&self, layout: &str, params: &Params) -> String {
        self.join(&format!("layouts/{}", layout), params)
    }

    pub fn fragment_url(&self, fragment: &str, params: &Params) -> String {
        self.join(fragment, params)
    }

    /// The route's layout and fragments bound to concrete URLs, in fetch order.
    pub fn bind(&self, matched: &RouteMatch<'_>) -> Vec<Fragment> {
        let layout = matched
            .route
            .layout()
            .map(|layout| layout.bind(self.layout_url(&layout.path, &matched.params)));

        let fragments = matched
            .route
            .fragments()
            .iter()
            .map(|fragment| fragment.bind(self.fragment_url(&fragment.path, &matched.params)));

        layout.into_iter().chain(fragments).collect()
    }

    fn join(&self, path: &str, params: &Params) -> String {
        let mut url = self.base.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params.iter());
        }

        url.to_string()
    }
}

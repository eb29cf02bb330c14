//! Layout placeholder substitution.

/// Replaced by the concatenated fragment bodies.
pub const CONTENT_PLACEHOLDER: &str = "{{{VIEW_PROXY_CONTENT}}}";

/// Replaced by the resolved page title.
pub const TITLE_PLACEHOLDER: &str = "{{{VIEW_PROXY_PAGE_TITLE}}}";

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Replace the first occurrence of each token in `layout`.
///
/// Positions are located in the original layout, so replacement text is
/// never searched for other tokens. A token missing from the layout is
/// skipped, as is one overlapping an earlier match.
pub fn substitute(layout: &[u8], replacements: &[(&[u8], &[u8])]) -> Vec<u8> {
    let mut hits: Vec<(usize, usize, &[u8])> = replacements
        .iter()
        .filter_map(|(token, value)| find(layout, token).map(|at| (at, token.len(), *value)))
        .collect();
    hits.sort_by_key(|(at, _, _)| *at);

    let extra: usize = hits.iter().map(|(_, _, value)| value.len()).sum();
    let mut output = Vec::with_capacity(layout.len() + extra);
    let mut cursor = 0;

    for (at, len, value) in hits {
        if at < cursor {
            continue;
        }
        output.extend_from_slice(&layout[cursor..at]);
        output.extend_from_slice(value);
        cursor = at + len;
    }
    output.extend_from_slice(&layout[cursor..]);

    output
}

//! Package URL and display-name canonicalization.
//!
//! Generators disagree on how scoped package names are spelled
//! (`pkg:npm/%40actions/core` vs `pkg:npm/actions/core`) and on whether
//! qualifiers are attached, so identity comparisons always go through
//! [`normalize_purl`].

use regex::Regex;
use std::sync::LazyLock;

/// Matches a percent-encoded scope segment such as `%40actions/`
static SCOPE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%40([^/?#@]+)/").expect("scope segment pattern is valid")
});

/// Canonicalizes a package URL into its `scheme:opaque` identity form.
///
/// Percent-encoded scope markers are stripped and qualifiers (`?...`) and
/// subpaths (`#...`) are discarded. The scheme is lowercased. Inputs without
/// a scheme are returned trimmed but otherwise unchanged.
pub fn normalize_purl(purl: &str) -> String {
    let unscoped = SCOPE_SEGMENT.replace_all(purl.trim(), "$1/");

    let without_subpath = match unscoped.find('#') {
        Some(idx) => &unscoped[..idx],
        None => &unscoped[..],
    };
    let opaque_form = match without_subpath.find('?') {
        Some(idx) => &without_subpath[..idx],
        None => without_subpath,
    };

    match opaque_form.split_once(':') {
        Some((scheme, opaque)) if !scheme.is_empty() => {
            format!("{}:{}", scheme.to_lowercase(), opaque)
        }
        _ => opaque_form.to_string(),
    }
}

/// Canonicalizes a display name by trimming a leading `@` scope marker
pub fn normalize_name(name: &str) -> String {
    name.strip_prefix('@').unwrap_or(name).to_string()
}

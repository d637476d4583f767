use crate::shared::Result;
use anyhow::Context;
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// PathFilter - Excludes repository paths from root discovery
///
/// Supports glob wildcards: '*' matches zero or more characters within one
/// path segment. A pattern matches an entry when it matches either the entry's base name
/// or its '/'-separated path relative to the repository root.
#[derive(Debug, Default)]
pub struct PathFilter {
    patterns: Vec<ExcludePattern>,
}

impl PathFilter {
    /// Creates a new PathFilter from raw pattern strings
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, characters, wildcard-only)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let compiled_patterns = patterns
            .into_iter()
            .map(ExcludePattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns: compiled_patterns,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks whether a relative path is excluded
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        let full = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let base = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.patterns
            .iter()
            .any(|p| p.matches(&base) || p.matches(&full))
    }

    /// Returns the patterns that have not excluded anything so far
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.load(Ordering::Relaxed))
            .map(|p| p.original.clone())
            .collect()
    }
}

#[derive(Debug)]
struct ExcludePattern {
    original: String,
    matcher: GlobMatcher,
    matched: AtomicBool,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;
        let matcher = compile_pattern(&pattern)?;

        Ok(Self {
            original: pattern,
            matcher,
            matched: AtomicBool::new(false),
        })
    }

    fn matches(&self, candidate: &str) -> bool {
        let is_match = self.matcher.is_match(candidate);
        if is_match {
            self.matched.store(true, Ordering::Relaxed);
        }
        is_match
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    for ch in pattern.chars() {
        if !is_valid_pattern_char(ch) {
            anyhow::bail!(
                "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
                 Only alphanumeric, hyphens, underscores, dots, slashes, @ and asterisks (*) are allowed.",
                ch,
                pattern
            );
        }
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '@' | '*')
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    let trimmed = pattern.trim_end_matches('/');
    let glob = GlobBuilder::new(trimmed)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Invalid exclusion pattern '{}'", pattern))?;
    Ok(glob.compile_matcher())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn filter(patterns: &[&str]) -> PathFilter {
        PathFilter::new(patterns.iter().map(|p| p.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_exact_base_name() {
        let filter = filter(&["vendor"]);
        assert!(filter.is_excluded(&PathBuf::from("vendor")));
        assert!(filter.is_excluded(&PathBuf::from("services/api/vendor")));
        assert!(!filter.is_excluded(&PathBuf::from("vendored")));
    }

    #[test]
    fn test_relative_path_pattern() {
        let filter = filter(&["docs/examples"]);
        assert!(filter.is_excluded(&PathBuf::from("docs/examples")));
        assert!(!filter.is_excluded(&PathBuf::from("examples")));
    }

    #[test]
    fn test_leading_wildcard() {
        let filter = filter(&["*.generated"]);
        assert!(filter.is_excluded(&PathBuf::from("api/client.generated")));
        assert!(!filter.is_excluded(&PathBuf::from("generated")));
    }

    #[test]
    fn test_trailing_wildcard() {
        let filter = filter(&["fixture-*"]);
        assert!(filter.is_excluded(&PathBuf::from("fixture-node")));
        assert!(!filter.is_excluded(&PathBuf::from("my-fixture-node")));
    }

    #[test]
    fn test_inner_wildcard_is_anchored() {
        let filter = filter(&["sample*app"]);
        assert!(filter.is_excluded(&PathBuf::from("sample-web-app")));
        assert!(!filter.is_excluded(&PathBuf::from("sample-web-app-old")));
        assert!(!filter.is_excluded(&PathBuf::from("old-sample-app")));
    }

    #[test]
    fn test_inner_wildcard_rejects_overlap() {
        let filter = filter(&["ab*ba"]);
        assert!(filter.is_excluded(&PathBuf::from("abba")));
        assert!(!filter.is_excluded(&PathBuf::from("aba")));
    }

    #[test]
    fn test_path_wildcard() {
        let filter = filter(&["third_party/*"]);
        assert!(filter.is_excluded(&PathBuf::from("third_party/zlib")));
        assert!(!filter.is_excluded(&PathBuf::from("src/zlib")));
    }

    #[test]
    fn test_wildcard_stays_within_one_segment() {
        let filter = filter(&["third_party/*"]);
        assert!(!filter.is_excluded(&PathBuf::from("third_party/zlib/contrib")));
        assert!(filter.is_excluded(&PathBuf::from("third_party/zlib")));
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let filter = filter(&["vendor/"]);
        assert!(filter.is_excluded(&PathBuf::from("services/vendor")));
    }

    #[test]
    fn test_unmatched_patterns_reported() {
        let filter = filter(&["vendor", "never-there"]);
        filter.is_excluded(&PathBuf::from("vendor"));
        assert_eq!(filter.unmatched_patterns(), vec!["never-there".to_string()]);
    }

    #[test]
    fn test_rejects_invalid_patterns() {
        assert!(PathFilter::new(vec!["".to_string()]).is_err());
        assert!(PathFilter::new(vec!["**".to_string()]).is_err());
        assert!(PathFilter::new(vec!["bad|pattern".to_string()]).is_err());
        assert!(PathFilter::new(vec!["a".repeat(MAX_PATTERN_LENGTH + 1)]).is_err());
    }

    #[test]
    fn test_rejects_too_many_patterns() {
        let patterns = (0..=MAX_EXCLUDE_PATTERNS).map(|i| format!("p{}", i)).collect();
        let err = PathFilter::new(patterns).unwrap_err();
        assert!(err.to_string().contains("Too many exclusion patterns"));
    }
}

use super::PathFilter;
use crate::inventory::domain::MarkerFile;
use crate::ports::outbound::{FileTree, TreeEntry, WalkAction};
use crate::shared::error::SbomError;
use std::path::{Path, PathBuf};

/// Directory names whose subtrees never contain collection roots
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "test",
    "tests",
    "testdata",
];

/// RootFinder walks a repository tree and collects the entries a
/// collector's match predicate accepts.
///
/// Entries whose base name is in the ignore set, or that the optional
/// [`PathFilter`] excludes, are pruned together with all their descendants.
#[derive(Debug)]
pub struct RootFinder {
    ignored_names: Vec<String>,
    exclusions: PathFilter,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl RootFinder {
    pub fn new() -> Self {
        Self {
            ignored_names: DEFAULT_IGNORED_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
            exclusions: PathFilter::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: PathFilter) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn exclusions(&self) -> &PathFilter {
        &self.exclusions
    }

    fn is_pruned(&self, entry: &TreeEntry) -> bool {
        let ignored = entry
            .file_name()
            .is_some_and(|name| self.ignored_names.iter().any(|n| n == name));
        ignored || (!self.exclusions.is_empty() && self.exclusions.is_excluded(&entry.path))
    }

    /// Walks `root` once and returns the relative paths `matcher` accepted
    ///
    /// # Arguments
    /// * `tree` - Tree abstraction to enumerate
    /// * `root` - Repository root
    /// * `collector` - Collector name, for error reporting
    /// * `matcher` - Predicate called as `matcher(is_dir, relative_path)`
    ///
    /// # Returns
    /// Matched paths in walk order. An empty vector is a normal outcome.
    ///
    /// # Errors
    /// Returns `SbomError::RootDiscoveryFailed` if the tree cannot be read.
    pub fn discover<F>(
        &self,
        tree: &dyn FileTree,
        root: &Path,
        collector: &str,
        matcher: F,
    ) -> Result<Vec<PathBuf>, SbomError>
    where
        F: Fn(bool, &Path) -> bool,
    {
        let mut matched = Vec::new();

        tree.walk(root, &mut |entry: &TreeEntry| {
            if self.is_pruned(entry) {
                return WalkAction::SkipSubtree;
            }
            if matcher(entry.is_dir, &entry.path) {
                matched.push(entry.path.clone());
            }
            WalkAction::Continue
        })
        .map_err(|e| SbomError::RootDiscoveryFailed {
            collector: collector.to_string(),
            details: format!("{:#}", e),
        })?;

        Ok(matched)
    }

    /// Turns discovered relative paths into markers of `collector` under `root`
    ///
    /// # Errors
    /// Returns `SbomError::NoRootsFound` when nothing was discovered.
    pub fn to_absolute(
        root: &Path,
        relative: Vec<PathBuf>,
        collector: &str,
    ) -> Result<Vec<MarkerFile>, SbomError> {
        if relative.is_empty() {
            return Err(SbomError::NoRootsFound {
                collector: collector.to_string(),
            });
        }

        Ok(relative
            .into_iter()
            .map(|p| MarkerFile::new(root.join(p), collector))
            .collect())
    }
}

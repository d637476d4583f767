use crate::shared::Result;
use std::path::{Path, PathBuf};

/// One entry visited during a tree walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the walked root
    pub path: PathBuf,
    pub is_dir: bool,
}

impl TreeEntry {
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    /// Base name of the entry, if it is valid UTF-8
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// What the walker should do after visiting an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    Continue,
    /// Do not descend into this directory (ignored for files)
    SkipSubtree,
}

/// FileTree port for read-only, depth-first enumeration of a directory tree
///
/// This port abstracts the filesystem so root discovery can be exercised
/// against in-memory trees.
pub trait FileTree: Send + Sync {
    /// Visits every entry below `root` exactly once, depth-first
    ///
    /// # Arguments
    /// * `root` - Directory to walk; the root itself is not visited
    /// * `visitor` - Called per entry with a path relative to `root`
    ///
    /// # Errors
    /// Returns an error if any part of the tree cannot be read. The walk
    /// stops at the first such error.
    fn walk(&self, root: &Path, visitor: &mut dyn FnMut(&TreeEntry) -> WalkAction) -> Result<()>;
}

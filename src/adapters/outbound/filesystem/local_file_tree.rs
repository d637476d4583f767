use crate::ports::outbound::{FileTree, TreeEntry, WalkAction};
use crate::shared::Result;
use anyhow::Context;
use std::path::Path;
use walkdir::WalkDir;

/// LocalFileTree adapter walking the real filesystem with walkdir
///
/// Entries are visited depth-first in file-name order. Symbolic links are
/// not followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileTree;

impl LocalFileTree {
    pub fn new() -> Self {
        Self
    }
}

impl FileTree for LocalFileTree {
    fn walk(&self, root: &Path, visitor: &mut dyn FnMut(&TreeEntry) -> WalkAction) -> Result<()> {
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let entry = next.with_context(|| format!("Failed to walk {}", root.display()))?;
            let relative = entry.path().strip_prefix(root).with_context(|| {
                format!(
                    "Entry {} is outside of {}",
                    entry.path().display(),
                    root.display()
                )
            })?;
            let is_dir = entry.file_type().is_dir();

            let action = visitor(&TreeEntry::new(relative, is_dir));
            if action == WalkAction::SkipSubtree && is_dir {
                walker.skip_current_dir();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        fs::write(dir.path().join("sub/Cargo.lock"), "").unwrap();
        fs::write(dir.path().join("sub/inner/go.mod"), "").unwrap();
        dir
    }

    #[test]
    fn test_walk_visits_every_entry_with_relative_paths() {
        let dir = create_test_tree();
        let mut seen = Vec::new();

        LocalFileTree::new()
            .walk(dir.path(), &mut |entry| {
                seen.push((entry.path.clone(), entry.is_dir));
                WalkAction::Continue
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (PathBuf::from("Cargo.toml"), false),
                (PathBuf::from("sub"), true),
                (PathBuf::from("sub/Cargo.lock"), false),
                (PathBuf::from("sub/inner"), true),
                (PathBuf::from("sub/inner/go.mod"), false),
            ]
        );
    }

    #[test]
    fn test_walk_skips_subtree() {
        let dir = create_test_tree();
        let mut seen = Vec::new();

        LocalFileTree::new()
            .walk(dir.path(), &mut |entry| {
                seen.push(entry.path.clone());
                if entry.path == Path::new("sub") {
                    WalkAction::SkipSubtree
                } else {
                    WalkAction::Continue
                }
            })
            .unwrap();

        assert_eq!(seen, vec![PathBuf::from("Cargo.toml"), PathBuf::from("sub")]);
    }

    #[test]
    fn test_walk_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let result = LocalFileTree::new().walk(&missing, &mut |_| WalkAction::Continue);

        assert!(result.is_err());
    }
}

use bom_harvest::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// In-memory FileTree built from relative file paths
///
/// Parent directories are implied. Entries are walked depth-first in
/// lexicographic order, honoring `WalkAction::SkipSubtree`.
pub struct InMemoryFileTree {
    entries: Vec<TreeEntry>,
}

impl InMemoryFileTree {
    pub fn new(files: &[&str]) -> Self {
        let mut dirs = BTreeSet::new();
        let mut all = BTreeSet::new();
        for file in files {
            let path = PathBuf::from(file);
            for ancestor in path.ancestors().skip(1) {
                if !ancestor.as_os_str().is_empty() {
                    dirs.insert(ancestor.to_path_buf());
                    all.insert(ancestor.to_path_buf());
                }
            }
            all.insert(path);
        }

        let entries = all
            .into_iter()
            .map(|p| {
                let is_dir = dirs.contains(&p);
                TreeEntry::new(p, is_dir)
            })
            .collect();
        Self { entries }
    }
}

impl FileTree for InMemoryFileTree {
    fn walk(&self, _root: &Path, visitor: &mut dyn FnMut(&TreeEntry) -> WalkAction) -> Result<()> {
        let mut skipped: Vec<&Path> = Vec::new();
        for entry in &self.entries {
            if skipped.iter().any(|s| entry.path.starts_with(s)) {
                continue;
            }
            if visitor(entry) == WalkAction::SkipSubtree && entry.is_dir {
                skipped.push(&entry.path);
            }
        }
        Ok(())
    }
}

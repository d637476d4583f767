use crate::inventory::domain::{MarkerFile, ProjectRoot};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// How a collector wants its marker files reduced to collection roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootReduction {
    /// One file per directory: `file` when present, else any marker but `manifest`
    Preferred {
        file: &'static str,
        manifest: &'static str,
    },
    /// Directory identity only
    Squash,
}

/// PathReducer groups marker files by owning directory
pub struct PathReducer;

impl PathReducer {
    /// Reduces markers to one file per directory
    ///
    /// A directory holding a single marker yields that marker. A directory
    /// holding several yields the one named `preferred`. When none carries
    /// that name, the first marker other than `manifest` is kept, so a lock
    /// file still beats the manifest it was resolved from.
    ///
    /// # Returns
    /// Selected files ordered by directory
    pub fn normalize(preferred: &str, manifest: &str, markers: &[MarkerFile]) -> Vec<PathBuf> {
        Self::group_by_parent(markers)
            .into_values()
            .filter_map(|mut files| {
                files.sort();
                let idx = files
                    .iter()
                    .position(|f| is_named(f, preferred))
                    .or_else(|| files.iter().position(|f| !is_named(f, manifest)))
                    .unwrap_or(0);
                (idx < files.len()).then(|| files.swap_remove(idx))
            })
            .collect()
    }

    /// Reduces markers to the unique set of parent directories
    pub fn squash(markers: &[MarkerFile]) -> Vec<PathBuf> {
        markers
            .iter()
            .map(|m| parent_of(m.path()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Builds project roots for the given reduction strategy
    ///
    /// Every root records all marker file names found directly in its
    /// directory, whichever file the reduction selected.
    pub fn reduce(reduction: RootReduction, markers: &[MarkerFile]) -> Vec<ProjectRoot> {
        let groups = Self::group_by_parent(markers);
        let marker_names = |dir: &Path| -> BTreeSet<String> {
            groups
                .get(dir)
                .map(|files| {
                    files
                        .iter()
                        .filter_map(|f| f.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default()
        };

        match reduction {
            RootReduction::Preferred { file, manifest } => {
                Self::normalize(file, manifest, markers)
                    .into_iter()
                    .map(|selected| {
                        let dir = parent_of(&selected);
                        ProjectRoot::new(dir.clone(), marker_names(&dir)).with_primary(selected)
                    })
                    .collect()
            }
            RootReduction::Squash => Self::squash(markers)
                .into_iter()
                .map(|dir| {
                    let names = marker_names(&dir);
                    ProjectRoot::new(dir, names)
                })
                .collect(),
        }
    }

    fn group_by_parent(markers: &[MarkerFile]) -> BTreeMap<PathBuf, Vec<PathBuf>> {
        let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for marker in markers {
            groups
                .entry(parent_of(marker.path()))
                .or_default()
                .push(marker.path().to_path_buf());
        }
        groups
    }
}

fn is_named(path: &Path, name: &str) -> bool {
    path.file_name().is_some_and(|n| n == name)
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// MarkerFile is a path whose presence a collector's predicate recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFile {
    path: PathBuf,
    collector: String,
}

impl MarkerFile {
    pub fn new(path: PathBuf, collector: &str) -> Self {
        Self {
            path,
            collector: collector.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn collector(&self) -> &str {
        &self.collector
    }
}

/// ProjectRoot is one collection point for a per-project collector
///
/// Holds the directory and the names of the marker files found directly
/// inside it. `primary` is the file the path reducer preferred, when the
/// collector asked for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    directory: PathBuf,
    markers: BTreeSet<String>,
    primary: Option<PathBuf>,
}

impl ProjectRoot {
    pub fn new(directory: PathBuf, markers: BTreeSet<String>) -> Self {
        Self {
            directory,
            markers,
            primary: None,
        }
    }

    pub fn with_primary(mut self, primary: PathBuf) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn markers(&self) -> &BTreeSet<String> {
        &self.markers
    }

    pub fn primary(&self) -> Option<&Path> {
        self.primary.as_deref()
    }

    pub fn has_marker(&self, file_name: &str) -> bool {
        self.markers.contains(file_name)
    }

    pub fn has_any_marker(&self, file_names: &[&str]) -> bool {
        file_names.iter().any(|name| self.has_marker(name))
    }

    /// Returns a new root that also records `file_name`, e.g. after a lockfile was materialised
    pub fn with_marker(&self, file_name: &str) -> Self {
        let mut markers = self.markers.clone();
        markers.insert(file_name.to_string());
        Self {
            directory: self.directory.clone(),
            markers,
            primary: self.primary.clone(),
        }
    }
}

use crate::inventory::domain::{Bom, ProjectRoot};
use crate::inventory::services::RootReduction;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// A collector that runs once against a whole checkout
#[async_trait]
pub trait RepositoryCollector: Send + Sync {
    fn name(&self) -> &str;

    /// Generates a BOM for the repository rooted at `repository_root`
    ///
    /// # Errors
    /// Any error is contained by the orchestrator: it is logged and the
    /// collector contributes nothing.
    async fn generate(&self, repository_root: &Path) -> Result<Bom>;
}

/// A collector that runs once per discovered project root
#[async_trait]
pub trait ProjectCollector: Send + Sync {
    fn name(&self) -> &str;

    /// Marker predicate, called once per tree entry with a path relative to
    /// the repository root. Must be pure.
    fn matches(&self, is_dir: bool, path: &Path) -> bool;

    /// How matched marker files are reduced to project roots
    fn reduction(&self) -> RootReduction;

    /// Materializes missing lock data for `root`
    ///
    /// Returns the root to generate from, with any marker files the step
    /// created. The default implementation does nothing.
    ///
    /// # Errors
    /// The orchestrator drops the root and continues with its siblings.
    async fn bootstrap(&self, root: &ProjectRoot) -> Result<ProjectRoot> {
        Ok(root.clone())
    }

    /// Generates a BOM for one project root
    async fn generate(&self, root: &ProjectRoot) -> Result<Bom>;
}

/// The two collector capabilities, dispatched by kind
#[derive(Clone)]
pub enum Collector {
    Repository(Arc<dyn RepositoryCollector>),
    Project(Arc<dyn ProjectCollector>),
}

impl Collector {
    pub fn name(&self) -> &str {
        match self {
            Collector::Repository(c) => c.name(),
            Collector::Project(c) => c.name(),
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Collector::Repository(_) => "repository",
            Collector::Project(_) => "project",
        };
        f.debug_struct("Collector")
            .field("name", &self.name())
            .field("kind", &kind)
            .finish()
    }
}

/// Immutable set of collectors, built once and shared by every run
#[derive(Debug, Clone, Default)]
pub struct CollectorRegistry {
    collectors: Arc<[Collector]>,
}

impl CollectorRegistry {
    pub fn new(collectors: Vec<Collector>) -> Self {
        Self {
            collectors: collectors.into(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collector> {
        self.collectors.iter()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.collectors.iter().map(Collector::name).collect()
    }
}

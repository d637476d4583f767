use crate::inventory::domain::Scope;
use std::path::PathBuf;

/// Request for collecting a merged BOM from one local repository
#[derive(Debug, Clone, Default)]
pub struct CollectRequest {
    /// Root of the checkout to scan
    pub repository_root: PathBuf,
    /// Wildcard patterns pruned during root discovery
    pub exclude_paths: Vec<String>,
    /// Components with this scope are removed after merging
    pub exclude_scope: Option<Scope>,
    /// Fill missing CPE identifiers after merging
    pub attach_cpe: bool,
    /// Free-form tags recorded in the merged BOM's metadata
    pub tags: Vec<String>,
}

impl CollectRequest {
    pub fn new(repository_root: PathBuf) -> Self {
        Self {
            repository_root,
            ..Default::default()
        }
    }

    pub fn builder() -> CollectRequestBuilder {
        CollectRequestBuilder::default()
    }
}

/// Builder for [`CollectRequest`]
#[derive(Debug, Default)]
pub struct CollectRequestBuilder {
    request: CollectRequest,
}

impl CollectRequestBuilder {
    pub fn repository_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.request.repository_root = path.into();
        self
    }

    pub fn exclude_paths(mut self, patterns: Vec<String>) -> Self {
        self.request.exclude_paths = patterns;
        self
    }

    pub fn exclude_scope(mut self, scope: Option<Scope>) -> Self {
        self.request.exclude_scope = scope;
        self
    }

    pub fn attach_cpe(mut self, enabled: bool) -> Self {
        self.request.attach_cpe = enabled;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.request.tags = tags;
        self
    }

    pub fn build(self) -> CollectRequest {
        self.request
    }
}

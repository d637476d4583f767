use super::collect_bom::CollectBomUseCase;
use crate::application::dto::{CollectOutcome, CollectRequest};
use crate::ports::outbound::{CpeResolver, FileTree, ProgressReporter, RepositorySource};
use crate::shared::Result;
use anyhow::Context;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::{info, warn};

const WORKSPACE_PREFIX: &str = "bom-harvest-";

/// CollectRepositoryUseCase - collects a remote repository
///
/// Checks the repository out into a fresh temporary workspace, runs the
/// collection pipeline on it and removes the workspace afterwards, whether
/// the run succeeded, failed or was cancelled.
pub struct CollectRepositoryUseCase<RS, FT, CR, PR> {
    source: RS,
    collect: CollectBomUseCase<FT, CR, PR>,
    workspace_parent: Option<PathBuf>,
}

impl<RS, FT, CR, PR> CollectRepositoryUseCase<RS, FT, CR, PR>
where
    RS: RepositorySource,
    FT: FileTree,
    CR: CpeResolver,
    PR: ProgressReporter,
{
    pub fn new(source: RS, collect: CollectBomUseCase<FT, CR, PR>) -> Self {
        Self {
            source,
            collect,
            workspace_parent: None,
        }
    }

    /// Places temporary workspaces under `parent` instead of the system temp dir
    pub fn with_workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.workspace_parent = Some(parent.into());
        self
    }

    /// Checks out `repository` and collects it
    ///
    /// `request.repository_root` is replaced by the checkout location.
    ///
    /// # Errors
    /// Returns `SbomError::CheckoutFailed` when the checkout fails, plus
    /// anything [`CollectBomUseCase::execute`] returns.
    pub async fn execute(&self, repository: &str, request: CollectRequest) -> Result<CollectOutcome> {
        let workspace = self.create_workspace()?;
        info!(repository, workspace = %workspace.path().display(), "created workspace");

        let result = self.collect_in(repository, &workspace, request).await;

        let location = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            warn!(workspace = %location.display(), error = %e, "failed to remove workspace");
        }

        result
    }

    fn create_workspace(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let created = match &self.workspace_parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        created.context("Failed to create temporary workspace")
    }

    async fn collect_in(
        &self,
        repository: &str,
        workspace: &TempDir,
        request: CollectRequest,
    ) -> Result<CollectOutcome> {
        self.source.checkout(repository, workspace.path()).await?;

        let request = CollectRequest {
            repository_root: workspace.path().to_path_buf(),
            ..request
        };
        self.collect.execute(request).await
    }
}

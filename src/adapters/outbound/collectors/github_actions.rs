use crate::application::factories::CodecFactory;
use crate::inventory::domain::Bom;
use crate::ports::outbound::{BomTool, RepositoryCollector, ToolOptions};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

const WORKFLOWS_DIR: &str = ".github/workflows";

/// GithubActionsCollector: repository-wide collector for workflow actions
pub struct GithubActionsCollector {
    tool: Arc<dyn BomTool>,
    options: ToolOptions,
}

impl GithubActionsCollector {
    pub const NAME: &'static str = "github-actions";
    const ECOSYSTEM: &'static str = "github";

    pub fn new(tool: Arc<dyn BomTool>, options: ToolOptions) -> Self {
        Self { tool, options }
    }
}

#[async_trait]
impl RepositoryCollector for GithubActionsCollector {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, repository_root: &Path) -> Result<Bom> {
        let workflows = repository_root.join(WORKFLOWS_DIR);
        if !tokio::fs::metadata(&workflows)
            .await
            .is_ok_and(|m| m.is_dir())
        {
            return Err(SbomError::GenerationFailed {
                collector: Self::NAME.to_string(),
                root: repository_root.to_path_buf(),
                details: format!("no {} directory", WORKFLOWS_DIR),
            }
            .into());
        }

        let bytes = self
            .tool
            .generate(repository_root, Self::ECOSYSTEM, &self.options)
            .await?;
        CodecFactory::decode(&bytes)
    }
}

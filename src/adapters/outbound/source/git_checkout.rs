use crate::ports::outbound::{CommandRunner, RepositorySource};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// GitCheckout adapter: shallow `git clone` through a [`CommandRunner`]
pub struct GitCheckout {
    runner: Arc<dyn CommandRunner>,
}

impl GitCheckout {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl RepositorySource for GitCheckout {
    async fn checkout(&self, repository: &str, destination: &Path) -> Result<()> {
        info!(repository, destination = %destination.display(), "cloning repository");

        let args: Vec<String> = ["clone", "--depth", "1", "--quiet", "--", repository, "."]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let output = self.runner.run(destination, "git", &args).await?;

        if !output.success() {
            return Err(SbomError::CheckoutFailed {
                repository: repository.to_string(),
                details: output.stderr_text(),
            }
            .into());
        }
        Ok(())
    }
}

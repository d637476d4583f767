use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// RepositorySource port for materializing a remote repository locally
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Checks `repository` out into `destination`
    ///
    /// `destination` is owned by the caller, who removes it afterwards.
    ///
    /// # Errors
    /// Returns `SbomError::CheckoutFailed` if the checkout cannot be made,
    /// or `SbomError::Cancelled` if it was aborted.
    async fn checkout(&self, repository: &str, destination: &Path) -> Result<()>;
}

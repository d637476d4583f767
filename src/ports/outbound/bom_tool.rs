use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// Options forwarded to an external BOM generator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOptions {
    /// Requested encoding name ("json" or "xml")
    pub format: String,
    /// Extra arguments appended to the expanded template
    pub extra_args: Vec<String>,
}

impl ToolOptions {
    pub fn json() -> Self {
        Self {
            format: "json".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// BomTool port: the external generation boundary
///
/// `(working directory, ecosystem identifier, options) -> raw BOM bytes`.
/// Implementations treat a known failure marker at the start of the output
/// as a failure even when the tool exits successfully.
#[async_trait]
pub trait BomTool: Send + Sync {
    async fn generate(
        &self,
        working_dir: &Path,
        ecosystem: &str,
        options: &ToolOptions,
    ) -> Result<Vec<u8>>;
}

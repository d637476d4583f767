use crate::ports::outbound::{BomTool, CommandRunner, ToolOptions};
use crate::shared::error::SbomError;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const ECOSYSTEM_PLACEHOLDER: &str = "{ecosystem}";
const OUTPUT_PLACEHOLDER: &str = "{output}";
const FORMAT_PLACEHOLDER: &str = "{format}";

/// How to invoke the external BOM generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    /// Argument template; may use `{ecosystem}`, `{output}` and `{format}`
    pub args: Vec<String>,
    /// Output prefixes that mean failure despite a zero exit status
    pub failure_markers: Vec<String>,
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self {
            program: "cdxgen".to_string(),
            args: [
                "-t",
                ECOSYSTEM_PLACEHOLDER,
                "--no-recurse",
                "-o",
                OUTPUT_PLACEHOLDER,
                ".",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            failure_markers: vec!["error".to_string()],
        }
    }
}

impl ToolCommand {
    fn writes_output_file(&self) -> bool {
        self.args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER))
    }

    fn expand(&self, ecosystem: &str, output: &str, options: &ToolOptions) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace(ECOSYSTEM_PLACEHOLDER, ecosystem)
                    .replace(OUTPUT_PLACEHOLDER, output)
                    .replace(FORMAT_PLACEHOLDER, &options.format)
            })
            .chain(options.extra_args.iter().cloned())
            .collect()
    }

    /// Returns the failure marker `output` starts with, ignoring case and
    /// leading whitespace
    fn failure_marker_in(&self, output: &[u8]) -> Option<&str> {
        let start = output
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(output.len());
        let head = &output[start..];

        self.failure_markers
            .iter()
            .filter(|m| !m.is_empty())
            .find(|m| {
                head.len() >= m.len() && head[..m.len()].eq_ignore_ascii_case(m.as_bytes())
            })
            .map(String::as_str)
    }
}

/// CommandBomTool adapter invoking an external generator through a
/// [`CommandRunner`]
///
/// When the argument template names `{output}`, the tool writes into a
/// private temporary file that is read back; otherwise stdout is the BOM.
pub struct CommandBomTool {
    runner: Arc<dyn CommandRunner>,
    command: ToolCommand,
}

impl CommandBomTool {
    pub fn new(runner: Arc<dyn CommandRunner>, command: ToolCommand) -> Self {
        Self { runner, command }
    }

    fn failure(&self, details: impl Into<String>) -> SbomError {
        SbomError::ToolFailed {
            program: self.command.program.clone(),
            details: details.into(),
        }
    }
}

#[async_trait]
impl BomTool for CommandBomTool {
    async fn generate(
        &self,
        working_dir: &Path,
        ecosystem: &str,
        options: &ToolOptions,
    ) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("bom-harvest-out-")
            .tempdir()
            .context("Failed to create temporary output directory")?;
        let output_path = scratch.path().join(format!("bom.{}", options.format));
        let args = self.command.expand(
            ecosystem,
            &output_path.to_string_lossy(),
            options,
        );

        let output = self
            .runner
            .run(working_dir, &self.command.program, &args)
            .await?;

        if !output.success() {
            return Err(self
                .failure(format!(
                    "exit status {}: {}",
                    output
                        .status
                        .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    output.stderr_text()
                ))
                .into());
        }

        let bytes = if self.command.writes_output_file() {
            tokio::fs::read(&output_path).await.map_err(|e| {
                self.failure(format!(
                    "no output written to {}: {}",
                    output_path.display(),
                    e
                ))
            })?
        } else {
            output.stdout
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(self.failure("empty output").into());
        }
        if let Some(marker) = self.command.failure_marker_in(&bytes) {
            return Err(self
                .failure(format!("output starts with failure marker '{}'", marker))
                .into());
        }

        debug!(
            program = %self.command.program,
            ecosystem,
            bytes = bytes.len(),
            "external tool produced BOM"
        );
        Ok(bytes)
    }
}

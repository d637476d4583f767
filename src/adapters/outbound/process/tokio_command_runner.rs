use crate::ports::outbound::{CommandOutput, CommandRunner};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// TokioCommandRunner adapter running external programs as child processes
///
/// A child is killed as soon as the shared cancellation token fires or the
/// optional per-invocation timeout elapses.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        working_dir: &Path,
        program: &str,
        args: &[String],
    ) -> Result<CommandOutput> {
        if self.cancel.is_cancelled() {
            return Err(SbomError::Cancelled.into());
        }

        debug!(program, ?args, dir = %working_dir.display(), "spawning command");

        let child = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SbomError::ToolFailed {
                program: program.to_string(),
                details: format!("failed to start: {}", e),
            })?;

        let timeout = self.timeout;
        let completion = async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                    .await
                    .map_err(|_| SbomError::ToolFailed {
                        program: program.to_string(),
                        details: format!("timed out after {}s", limit.as_secs()),
                    }),
                None => Ok(child.wait_with_output().await),
            }
        };

        // Dropping the pending future drops the child, which kills it
        let output = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(program, "command cancelled");
                return Err(SbomError::Cancelled.into());
            }
            result = completion => result?.map_err(|e| SbomError::ToolFailed {
                program: program.to_string(),
                details: format!("failed to wait for process: {}", e),
            })?,
        };

        debug!(program, status = ?output.status.code(), "command finished");

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

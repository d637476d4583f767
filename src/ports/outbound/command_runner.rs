use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// Captured result of one external process invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status code; `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Trimmed stderr as lossy UTF-8, for error messages
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// CommandRunner port for executing external programs
///
/// Every collector and bootstrap step reaches external tools through this
/// port, so tests can substitute a deterministic fake.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` inside `working_dir` and waits for it
    ///
    /// # Errors
    /// Returns an error if the program cannot be spawned, or
    /// `SbomError::Cancelled` if the run was aborted before completion.
    /// A non-zero exit status is not an error at this level.
    async fn run(&self, working_dir: &Path, program: &str, args: &[String])
        -> Result<CommandOutput>;
}

use async_trait::async_trait;
use bom_harvest::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded invocation: (working directory, program, arguments)
pub type Invocation = (PathBuf, String, Vec<String>);

/// Mock CommandRunner that records invocations instead of spawning processes
///
/// On success it can create a file in the working directory, standing in
/// for a lock step that writes its lockfile.
#[derive(Default)]
pub struct MockCommandRunner {
    exit_status: i32,
    creates: Option<&'static str>,
    calls: Mutex<Vec<Invocation>>,
}

#[allow(dead_code)]
impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(exit_status: i32) -> Self {
        Self {
            exit_status,
            ..Default::default()
        }
    }

    pub fn creating(file_name: &'static str) -> Self {
        Self {
            creates: Some(file_name),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, working_dir: &Path, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push((
            working_dir.to_path_buf(),
            program.to_string(),
            args.to_vec(),
        ));

        if self.exit_status == 0 {
            if let Some(file_name) = self.creates {
                std::fs::write(working_dir.join(file_name), "")?;
            }
        }

        Ok(CommandOutput {
            status: Some(self.exit_status),
            stdout: Vec::new(),
            stderr: if self.exit_status == 0 {
                Vec::new()
            } else {
                b"resolution failed".to_vec()
            },
        })
    }
}

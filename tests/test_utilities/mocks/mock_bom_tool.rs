use async_trait::async_trait;
use bom_harvest::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Mock BomTool producing a one-component CycloneDX JSON document per call
///
/// The component is named after the directory it was run in and typed by
/// the ecosystem identifier, e.g. `pkg:rust/sub@1.0.0`.
#[derive(Default)]
pub struct MockBomTool {
    failing_dirs: HashSet<PathBuf>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

#[allow(dead_code)]
impl MockBomTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failing_dirs.insert(dir.into());
        self
    }

    /// Recorded (directory, ecosystem) pairs, sorted
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

#[async_trait]
impl BomTool for MockBomTool {
    async fn generate(
        &self,
        working_dir: &Path,
        ecosystem: &str,
        _options: &ToolOptions,
    ) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((working_dir.to_path_buf(), ecosystem.to_string()));

        if self.failing_dirs.contains(working_dir) {
            return Err(SbomError::ToolFailed {
                program: "mock-tool".to_string(),
                details: "error: unsupported project".to_string(),
            }
            .into());
        }

        let name = working_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        let document = serde_json::json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "version": 1,
            "components": [{
                "type": "library",
                "name": name,
                "version": "1.0.0",
                "purl": format!("pkg:{}/{}@1.0.0", ecosystem, name),
            }],
            "dependencies": [{
                "ref": format!("pkg:{}/{}@1.0.0", ecosystem, name),
                "dependsOn": []
            }]
        });
        Ok(serde_json::to_vec(&document)?)
    }
}

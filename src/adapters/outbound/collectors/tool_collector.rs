use super::ecosystem::Ecosystem;
use crate::application::factories::CodecFactory;
use crate::inventory::domain::{Bom, ProjectRoot};
use crate::inventory::services::RootReduction;
use crate::ports::outbound::{BomTool, CommandRunner, ProjectCollector, ToolOptions};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// ToolCollector: a per-project collector driven by an [`Ecosystem`]
/// description
///
/// Bootstrap runs the ecosystem's lock step through the command runner;
/// generation delegates to the external BOM tool and decodes its output.
pub struct ToolCollector {
    ecosystem: Ecosystem,
    tool: Arc<dyn BomTool>,
    runner: Arc<dyn CommandRunner>,
    options: ToolOptions,
}

impl ToolCollector {
    pub fn new(
        ecosystem: Ecosystem,
        tool: Arc<dyn BomTool>,
        runner: Arc<dyn CommandRunner>,
        options: ToolOptions,
    ) -> Self {
        Self {
            ecosystem,
            tool,
            runner,
            options,
        }
    }

    pub fn ecosystem(&self) -> &Ecosystem {
        &self.ecosystem
    }
}

#[async_trait]
impl ProjectCollector for ToolCollector {
    fn name(&self) -> &str {
        self.ecosystem.name
    }

    fn matches(&self, is_dir: bool, path: &Path) -> bool {
        !is_dir
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.ecosystem.is_marker(n))
    }

    fn reduction(&self) -> RootReduction {
        self.ecosystem.reduction
    }

    async fn bootstrap(&self, root: &ProjectRoot) -> Result<ProjectRoot> {
        let Some(step) = self.ecosystem.bootstrap.filter(|s| s.is_needed(root)) else {
            return Ok(root.clone());
        };

        info!(
            collector = self.ecosystem.name,
            root = %root.directory().display(),
            program = step.program,
            "materializing lock data"
        );
        let args: Vec<String> = step.args.iter().map(|a| a.to_string()).collect();
        let output = self
            .runner
            .run(root.directory(), step.program, &args)
            .await?;
        if !output.success() {
            anyhow::bail!(
                "'{} {}' exited with {:?}: {}",
                step.program,
                args.join(" "),
                output.status,
                output.stderr_text()
            );
        }

        let produced = root.directory().join(step.produces);
        let exists = tokio::fs::try_exists(&produced)
            .await
            .with_context(|| format!("Failed to check {}", produced.display()))?;
        if !exists {
            anyhow::bail!("'{}' did not create {}", step.program, step.produces);
        }

        let updated = root.with_marker(step.produces);
        Ok(match self.ecosystem.reduction {
            RootReduction::Preferred { file, .. } if file == step.produces => {
                updated.with_primary(produced)
            }
            _ => updated,
        })
    }

    async fn generate(&self, root: &ProjectRoot) -> Result<Bom> {
        let bytes = self
            .tool
            .generate(root.directory(), self.ecosystem.ecosystem_id, &self.options)
            .await?;
        let bom = CodecFactory::decode(&bytes)?;
        debug!(
            collector = self.ecosystem.name,
            root = %root.directory().display(),
            components = bom.component_count(),
            "decoded BOM"
        );
        Ok(bom)
    }
}

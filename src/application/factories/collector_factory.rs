use crate::adapters::outbound::collectors::{
    GithubActionsCollector, ToolCollector, PROJECT_ECOSYSTEMS,
};
use crate::ports::outbound::{
    BomTool, Collector, CollectorRegistry, CommandRunner, ToolOptions,
};
use crate::shared::error::SbomError;
use std::sync::Arc;

/// Factory building the immutable registry of built-in collectors
pub struct CollectorFactory;

impl CollectorFactory {
    /// Names of every built-in collector, in registration order
    pub fn builtin_names() -> Vec<&'static str> {
        PROJECT_ECOSYSTEMS
            .iter()
            .map(|e| e.name)
            .chain(std::iter::once(GithubActionsCollector::NAME))
            .collect()
    }

    /// Builds the registry of built-in collectors
    ///
    /// # Arguments
    /// * `tool` - External BOM generator shared by all collectors
    /// * `runner` - Command runner for bootstrap steps
    /// * `options` - Options forwarded to every generator invocation
    /// * `enabled` - Collector names to keep; empty keeps all
    ///
    /// # Errors
    /// Returns `SbomError::ConfigError` if `enabled` names an unknown collector.
    pub fn builtin(
        tool: Arc<dyn BomTool>,
        runner: Arc<dyn CommandRunner>,
        options: ToolOptions,
        enabled: &[String],
    ) -> Result<CollectorRegistry, SbomError> {
        Self::validate_names(enabled)?;
        let is_enabled = |name: &str| enabled.is_empty() || enabled.iter().any(|e| e == name);

        let mut collectors: Vec<Collector> = PROJECT_ECOSYSTEMS
            .iter()
            .filter(|e| is_enabled(e.name))
            .map(|e| {
                Collector::Project(Arc::new(ToolCollector::new(
                    *e,
                    tool.clone(),
                    runner.clone(),
                    options.clone(),
                )))
            })
            .collect();

        if is_enabled(GithubActionsCollector::NAME) {
            collectors.push(Collector::Repository(Arc::new(GithubActionsCollector::new(
                tool, options,
            ))));
        }

        Ok(CollectorRegistry::new(collectors))
    }

    /// Rejects collector names that are not built in
    pub fn validate_names(names: &[String]) -> Result<(), SbomError> {
        let known = Self::builtin_names();
        match names.iter().find(|n| !known.contains(&n.as_str())) {
            Some(unknown) => Err(SbomError::ConfigError {
                message: format!("Unknown collector: '{}'", unknown),
                hint: format!("Available collectors: {}", known.join(", ")),
            }),
            None => Ok(()),
        }
    }
}

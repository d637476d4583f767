//! Configuration file support for bom-harvest.
//!
//! Provides YAML-based configuration through `bom-harvest.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::application::dto::BomFormat;
use crate::application::factories::CollectorFactory;
use crate::inventory::domain::Scope;
use crate::shared::error::SbomError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "bom-harvest.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub exclude_paths: Option<Vec<String>>,
    pub exclude_scope: Option<String>,
    pub collectors: Option<Vec<String>>,
    pub attach_cpe: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub jobs: Option<u64>,
    pub tool: Option<ToolConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// External BOM generator overrides.
#[derive(Debug, Deserialize, Default)]
pub struct ToolConfig {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    pub failure_markers: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> std::result::Result<(), SbomError> {
    if let Some(format) = &config.format {
        BomFormat::from_str(format)?;
    }

    if let Some(scope) = &config.exclude_scope {
        Scope::from_str(scope)?;
    }

    if let Some(collectors) = &config.collectors {
        CollectorFactory::validate_names(collectors)?;
    }

    if let Some(tags) = &config.tags {
        if let Some(i) = tags.iter().position(|t| t.trim().is_empty()) {
            return Err(SbomError::ConfigError {
                message: format!("tags[{}] must not be empty", i),
                hint: "Remove the empty entry or give it a value (e.g., \"team:payments\")"
                    .to_string(),
            });
        }
    }

    if config.jobs == Some(0) {
        return Err(SbomError::ConfigError {
            message: "jobs must be greater than zero".to_string(),
            hint: "Use 1 to run the generator for one project at a time".to_string(),
        });
    }

    if let Some(tool) = &config.tool {
        if tool.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(SbomError::ConfigError {
                message: "tool.program must not be empty".to_string(),
                hint: "Name the BOM generator executable (e.g., \"cdxgen\")".to_string(),
            });
        }
        if tool.timeout_secs == Some(0) {
            return Err(SbomError::ConfigError {
                message: "tool.timeout_secs must be greater than zero".to_string(),
                hint: "Omit the field to run the tool without a timeout".to_string(),
            });
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "unknown config field will be ignored");
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
    if let Some(tool) = &config.tool {
        for key in tool.unknown_fields.keys() {
            warn!(field = %key, "unknown tool config field will be ignored");
            eprintln!(
                "⚠️  Warning: Unknown config field 'tool.{}' will be ignored.",
                key
            );
        }
    }
}

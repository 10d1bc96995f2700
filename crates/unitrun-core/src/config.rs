//! Configuration loader for unitrun.

use crate::report::ReportFormat;
use crate::reporter::ReporterConfig;
use crate::runner::RunnerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "unitrun.config.yaml";

/// Errors that can occur during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("filter must not be empty")]
    EmptyFilter,
}

/// Configuration from `unitrun.config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitrunConfig {
    /// Output format (default: text).
    #[serde(default)]
    pub format: ReportFormat,

    /// Colored text output (default: true).
    #[serde(default = "default_color")]
    pub color: bool,

    /// Verbose text output (default: false).
    #[serde(default)]
    pub verbose: bool,

    /// Only run tests whose `unit::method` name contains this substring.
    #[serde(default)]
    pub filter: Option<String>,
}

const fn default_color() -> bool {
    true
}

impl Default for UnitrunConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            color: default_color(),
            verbose: false,
            filter: None,
        }
    }
}

impl UnitrunConfig {
    #[must_use]
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            filter: self.filter.clone(),
        }
    }

    #[must_use]
    pub const fn reporter_config(&self) -> ReporterConfig {
        ReporterConfig {
            verbose: self.verbose,
            color: self.color,
        }
    }
}

/// Load configuration from `dir/unitrun.config.yaml`.
///
/// If the file doesn't exist, returns default configuration.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The YAML is invalid
/// - `filter` is set to an empty string
pub fn load_config(dir: &Path) -> Result<UnitrunConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);

    let config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        serde_yml::from_str(&content)?
    } else {
        UnitrunConfig::default()
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validate the configuration.
fn validate_config(config: &UnitrunConfig) -> Result<(), ConfigError> {
    if config.filter.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::EmptyFilter);
    }
    Ok(())
}

/// CLI override options for configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub format: Option<ReportFormat>,
    pub color: Option<bool>,
    pub verbose: Option<bool>,
    pub filter: Option<String>,
}

/// Apply CLI overrides to a configuration.
///
/// # Errors
/// Returns `ConfigError::EmptyFilter` if the overridden filter is empty.
pub fn apply_overrides(
    mut config: UnitrunConfig,
    overrides: &ConfigOverrides,
) -> Result<UnitrunConfig, ConfigError> {
    if let Some(format) = overrides.format {
        config.format = format;
    }
    if let Some(color) = overrides.color {
        config.color = color;
    }
    if let Some(verbose) = overrides.verbose {
        config.verbose = verbose;
    }
    if let Some(ref filter) = overrides.filter {
        config.filter = Some(filter.clone());
    }
    validate_config(&config)?;
    Ok(config)
}

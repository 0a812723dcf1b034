//! Configuration
//!
//! Layered checker configuration: built-in defaults, then an optional
//! `agentcheck.toml` (or an explicit file), then `AGENTCHECK__*` environment
//! overrides.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::diagnostics::Severity;
use crate::error::CheckError;
use crate::logging::LoggingConfig;
use crate::validation::fuzzy::{DEFAULT_MAX_DISTANCE, DEFAULT_MAX_RESULTS};
use crate::validation::ValidationOptions;
use serde::{Deserialize, Serialize};

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "agentcheck.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Worker threads for multi-document runs.
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            workers: default_workers(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CheckerConfig {
    /// In-memory options handed to the pipeline.
    pub fn to_options(&self) -> Result<ValidationOptions, CheckError> {
        self.validation.to_options()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Severity of an unknown model under a known prefix: critical, error, warning
    #[serde(default = "default_model_drift_severity")]
    pub model_drift_severity: String,

    #[serde(default)]
    pub parallel_stages: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
            max_results: default_max_results(),
            model_drift_severity: default_model_drift_severity(),
            parallel_stages: false,
        }
    }
}

impl ValidationConfig {
    pub fn to_options(&self) -> Result<ValidationOptions, CheckError> {
        let model_drift_severity = Severity::parse(&self.model_drift_severity).ok_or_else(|| {
            CheckError::ConfigError(format!(
                "Invalid validation.model_drift_severity: {} (must be 'critical', 'error', or 'warning')",
                self.model_drift_severity
            ))
        })?;
        if self.max_results == 0 {
            return Err(CheckError::ConfigError(
                "validation.max_results must be at least 1".to_string(),
            ));
        }
        Ok(ValidationOptions {
            max_distance: self.max_distance,
            max_results: self.max_results,
            model_drift_severity,
            parallel_stages: self.parallel_stages,
        })
    }
}

fn default_max_distance() -> usize {
    DEFAULT_MAX_DISTANCE
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_model_drift_severity() -> String {
    Severity::Warning.as_str().to_string()
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

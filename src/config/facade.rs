//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::CheckerConfig;
use crate::error::CheckError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `agentcheck.toml` in `working_dir` and the environment.
    pub fn load(working_dir: &Path) -> Result<CheckerConfig, CheckError> {
        Ok(MergeService::load(working_dir)?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<CheckerConfig, CheckError> {
        Ok(MergeService::load_from_file(path)?)
    }

    /// `--config` wins; otherwise look in the working directory.
    pub fn resolve(config_path: Option<&Path>, working_dir: &Path) -> Result<CheckerConfig, CheckError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(working_dir),
        }
    }
}

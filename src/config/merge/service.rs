//! MergeService: orchestrates sources, applies merge policy, deserializes to CheckerConfig.

use crate::config::sources::{environment, workspace_file};
use crate::config::CheckerConfig;
use config::{ConfigBuilder, ConfigError, File};
use config::builder::DefaultState;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a working directory.
    /// Precedence: defaults (lowest) -> `agentcheck.toml` -> environment (highest).
    pub fn load(working_dir: &Path) -> Result<CheckerConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = workspace_file::add_to_builder(builder, working_dir)?;
        let builder = environment::add_to_builder(builder)?;
        Self::finish(builder)
    }

    /// Load config from a specific file with environment overlay. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<CheckerConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<CheckerConfig, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

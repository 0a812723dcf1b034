//! Optional `agentcheck.toml` in the working directory.

use crate::config::CONFIG_FILE_NAME;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    working_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = working_dir.join(CONFIG_FILE_NAME);
    Ok(builder.add_source(File::from(path).required(false)))
}

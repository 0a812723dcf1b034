//! Environment variable source: AGENTCHECK__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "AGENTCHECK";

/// `AGENTCHECK__VALIDATION__MAX_DISTANCE=1` sets `validation.max_distance`.
pub fn overlay() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Add environment variable overlay to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(overlay()))
}

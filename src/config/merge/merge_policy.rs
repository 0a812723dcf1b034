//! Merge policy: the builder every load starts from.
//!
//! Later sources override earlier ones key by key; defaults sit at the bottom.

use crate::validation::fuzzy::{DEFAULT_MAX_DISTANCE, DEFAULT_MAX_RESULTS};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("validation.max_distance", DEFAULT_MAX_DISTANCE as i64)?
        .set_default("validation.max_results", DEFAULT_MAX_RESULTS as i64)?
        .set_default("validation.model_drift_severity", "warning")?
        .set_default("validation.parallel_stages", false)
}

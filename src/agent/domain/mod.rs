pub mod coercion;
pub mod config;

pub use coercion::coerce_validated_config;
pub use config::{ServerRef, ValidatedConfig};

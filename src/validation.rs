//! Validation stages run over a decoded document.
//!
//! The schema, reference, and include stages are independent of each other.
//! Each returns its findings in a deterministic order and never stops early.

pub mod fuzzy;
pub mod includes;
pub mod references;
pub mod schema;

pub use fuzzy::{edit_distance, fuzzy_match, suggest};
pub use includes::{check_includes, scan_includes, IncludeReference};
pub use references::resolve_references;
pub use schema::{check_schema, FieldShape, FieldSpec, Schema};

use crate::diagnostics::Severity;

/// Tunables shared by all validation stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub max_distance: usize,
    pub max_results: usize,
    /// Severity of an unknown model under a known provider prefix.
    pub model_drift_severity: Severity,
    /// Run the three independent stages on scoped threads.
    pub parallel_stages: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_distance: fuzzy::DEFAULT_MAX_DISTANCE,
            max_results: fuzzy::DEFAULT_MAX_RESULTS,
            model_drift_severity: Severity::Warning,
            parallel_stages: false,
        }
    }
}

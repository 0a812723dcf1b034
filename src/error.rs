//! Operational error types.
//!
//! Problems found in a document are reported as [`crate::diagnostics::Diagnostic`]s.
//! `CheckError` covers everything else: unreadable inputs, malformed registry
//! snapshots, bad configuration, and broken internal invariants.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CheckError {
    fn from(err: config::ConfigError) -> Self {
        CheckError::ConfigError(err.to_string())
    }
}

//! Validated Agent Configuration
//!
//! The typed record handed to agent construction. It is only ever produced
//! from a document with no blocking diagnostics.

pub mod domain;

pub use domain::{coerce_validated_config, ServerRef, ValidatedConfig};

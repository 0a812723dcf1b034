//! agentcheck: Agent Frontmatter Validation
//!
//! Decodes the YAML frontmatter of agent definition documents, checks it
//! against the agent schema and the registries of known capabilities,
//! subservers, models, and include fragments, and reports every problem with
//! a location and concrete suggestions. Documents that pass yield a typed
//! [`ValidatedConfig`].

pub mod agent;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod format;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod tooling;
pub mod validation;

pub use agent::ValidatedConfig;
pub use diagnostics::{Category, Diagnostic, DiagnosticKind, DiagnosticReport, Location, Severity};
pub use document::{load_documents, RawDocument};
pub use error::CheckError;
pub use format::{format_report, format_reports, FormatMode};
pub use pipeline::{validate_document, validate_documents, DocumentValidator};
pub use registry::{FragmentRegistry, ModelRules, Registry};
pub use validation::ValidationOptions;

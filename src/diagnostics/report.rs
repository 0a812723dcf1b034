//! Aggregated findings for one document.

use super::{Diagnostic, Severity};
use crate::agent::ValidatedConfig;
use crate::error::CheckError;

/// Ordered findings for one document, plus the validated config when nothing
/// blocking was found.
///
/// Fields are private so a report can never hold a `ValidatedConfig` next to a
/// Critical or Error diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    path: String,
    diagnostics: Vec<Diagnostic>,
    config: Option<ValidatedConfig>,
}

impl DiagnosticReport {
    /// Report for a document that stopped at a syntax-group failure.
    pub fn short_circuit(path: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            path: path.into(),
            diagnostics: vec![diagnostic],
            config: None,
        }
    }

    /// Build a report from collected findings. `coerce` runs only when no
    /// finding is blocking.
    pub fn assemble<F>(
        path: impl Into<String>,
        diagnostics: Vec<Diagnostic>,
        coerce: F,
    ) -> Result<Self, CheckError>
    where
        F: FnOnce() -> Result<ValidatedConfig, CheckError>,
    {
        let blocked = diagnostics.iter().any(Diagnostic::is_blocking);
        let config = if blocked { None } else { Some(coerce()?) };
        Ok(Self {
            path: path.into(),
            diagnostics,
            config,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True iff no diagnostic is Critical or Error.
    pub fn passed(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_blocking)
    }

    pub fn config(&self) -> Option<&ValidatedConfig> {
        self.config.as_ref()
    }

    /// Hand the validated config onward; `None` when the document failed.
    pub fn into_config(self) -> Option<ValidatedConfig> {
        self.config
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, Location};

    fn warning() -> Diagnostic {
        Diagnostic::new(DiagnosticKind::UnknownField, Location::line(3), "unknown")
    }

    fn error() -> Diagnostic {
        Diagnostic::new(DiagnosticKind::UnknownCapability, Location::line(4), "bad tool")
    }

    #[test]
    fn warnings_do_not_block_coercion() {
        let report = DiagnosticReport::assemble("a.md", vec![warning()], || {
            Ok(ValidatedConfig::named("a", "b"))
        })
        .unwrap();
        assert!(report.passed());
        assert!(report.config().is_some());
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn blocking_findings_skip_coercion() {
        let report = DiagnosticReport::assemble("a.md", vec![warning(), error()], || {
            Err(CheckError::InvariantViolation("must not run".to_string()))
        })
        .unwrap();
        assert!(!report.passed());
        assert!(report.config().is_none());
        assert_eq!(report.diagnostics().len(), 2);
    }

    #[test]
    fn short_circuit_holds_exactly_one_finding() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::SyntaxError,
            Location::at(2, 5),
            "bad yaml",
        );
        let report = DiagnosticReport::short_circuit("a.md", diagnostic);
        assert_eq!(report.diagnostics().len(), 1);
        assert!(!report.passed());
        assert!(report.into_config().is_none());
    }
}

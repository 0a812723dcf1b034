//! Diagnostics
//!
//! A diagnostic is one typed, localized finding about an agent document. Every
//! diagnostic has the same shape; the closed [`DiagnosticKind`] enum carries the
//! semantic category, and each kind has a fixed default severity.

mod report;

pub use report::DiagnosticReport;

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is.
///
/// Ordering follows rendering priority: `Critical < Error < Warning`, so
/// sorting ascending puts the blocking findings first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
}

impl Severity {
    /// Critical and Error findings block construction of a validated config.
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Critical | Severity::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Error => "Errors",
            Severity::Warning => "Warnings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "error" => Some(Severity::Error),
            "warning" | "warn" => Some(Severity::Warning),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level group of a diagnostic kind, reported as `error_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Syntax,
    Schema,
    Reference,
    Include,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Syntax => "syntax",
            Category::Schema => "schema",
            Category::Reference => "reference",
            Category::Include => "include",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    MissingFrontmatterDelimiter,
    UnterminatedFrontmatter,
    SyntaxError,
    MissingRequiredField,
    WrongFieldType,
    UnknownField,
    UnknownCapability,
    UnknownSubserver,
    MissingModelPrefix,
    UnknownModelPrefix,
    UnknownModelForPrefix,
    MissingIncludeFragment,
}

impl DiagnosticKind {
    pub fn category(self) -> Category {
        match self {
            DiagnosticKind::MissingFrontmatterDelimiter
            | DiagnosticKind::UnterminatedFrontmatter
            | DiagnosticKind::SyntaxError => Category::Syntax,
            DiagnosticKind::MissingRequiredField
            | DiagnosticKind::WrongFieldType
            | DiagnosticKind::UnknownField => Category::Schema,
            DiagnosticKind::UnknownCapability
            | DiagnosticKind::UnknownSubserver
            | DiagnosticKind::MissingModelPrefix
            | DiagnosticKind::UnknownModelPrefix
            | DiagnosticKind::UnknownModelForPrefix => Category::Reference,
            DiagnosticKind::MissingIncludeFragment => Category::Include,
        }
    }

    /// Severity used unless the caller overrides it (only model catalog drift
    /// is configurable).
    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticKind::MissingFrontmatterDelimiter
            | DiagnosticKind::UnterminatedFrontmatter
            | DiagnosticKind::SyntaxError
            | DiagnosticKind::MissingRequiredField => Severity::Critical,
            DiagnosticKind::WrongFieldType
            | DiagnosticKind::UnknownCapability
            | DiagnosticKind::UnknownSubserver
            | DiagnosticKind::MissingModelPrefix
            | DiagnosticKind::UnknownModelPrefix
            | DiagnosticKind::MissingIncludeFragment => Severity::Error,
            DiagnosticKind::UnknownField | DiagnosticKind::UnknownModelForPrefix => {
                Severity::Warning
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::MissingFrontmatterDelimiter => "MissingFrontmatterDelimiter",
            DiagnosticKind::UnterminatedFrontmatter => "UnterminatedFrontmatter",
            DiagnosticKind::SyntaxError => "SyntaxError",
            DiagnosticKind::MissingRequiredField => "MissingRequiredField",
            DiagnosticKind::WrongFieldType => "WrongFieldType",
            DiagnosticKind::UnknownField => "UnknownField",
            DiagnosticKind::UnknownCapability => "UnknownCapability",
            DiagnosticKind::UnknownSubserver => "UnknownSubserver",
            DiagnosticKind::MissingModelPrefix => "MissingModelPrefix",
            DiagnosticKind::UnknownModelPrefix => "UnknownModelPrefix",
            DiagnosticKind::UnknownModelForPrefix => "UnknownModelForPrefix",
            DiagnosticKind::MissingIncludeFragment => "MissingIncludeFragment",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a finding in the original file (1-based).
///
/// `column` is only set where it is known exactly (decoder errors, include
/// tokens). Locations derived from re-scanned header spans are line-accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: Option<usize>,
    pub end_line: Option<usize>,
}

impl Location {
    pub fn line(line: usize) -> Self {
        Self {
            line,
            column: None,
            end_line: None,
        }
    }

    pub fn at(line: usize, column: usize) -> Self {
        Self {
            line,
            column: Some(column),
            end_line: None,
        }
    }

    pub fn spanning(line: usize, end_line: usize) -> Self {
        Self {
            line,
            column: None,
            end_line: (end_line > line).then_some(end_line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)?;
        if let Some(column) = self.column {
            write!(f, ", column {}", column)?;
        }
        if let Some(end_line) = self.end_line {
            write!(f, " (through line {})", end_line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the kind's default severity.
    pub fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            location,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions.extend(suggestions.into_iter().map(Into::into));
        self
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_kinds_are_critical() {
        for kind in [
            DiagnosticKind::MissingFrontmatterDelimiter,
            DiagnosticKind::UnterminatedFrontmatter,
            DiagnosticKind::SyntaxError,
        ] {
            assert_eq!(kind.category(), Category::Syntax);
            assert_eq!(kind.default_severity(), Severity::Critical);
        }
    }

    #[test]
    fn catalog_drift_is_a_warning_by_default() {
        let kind = DiagnosticKind::UnknownModelForPrefix;
        assert_eq!(kind.category(), Category::Reference);
        assert!(!kind.default_severity().is_blocking());
    }

    #[test]
    fn severity_orders_critical_first() {
        let mut severities = vec![Severity::Warning, Severity::Critical, Severity::Error];
        severities.sort();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::Error, Severity::Warning]
        );
    }

    #[test]
    fn severity_parse_accepts_config_spellings() {
        assert_eq!(Severity::parse("Warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("warn"), Some(Severity::Warning));
        assert_eq!(Severity::parse(" error "), Some(Severity::Error));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn location_display_includes_known_parts_only() {
        assert_eq!(Location::line(4).to_string(), "line 4");
        assert_eq!(Location::at(4, 7).to_string(), "line 4, column 7");
        assert_eq!(
            Location::spanning(4, 6).to_string(),
            "line 4 (through line 6)"
        );
        assert_eq!(Location::spanning(4, 4).end_line, None);
    }

    #[test]
    fn builder_overrides_severity_and_appends_suggestions() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnknownModelForPrefix,
            Location::line(3),
            "unknown model",
        )
        .with_severity(Severity::Error)
        .with_suggestions(["openai/gpt-4o"]);

        assert!(diagnostic.is_blocking());
        assert_eq!(diagnostic.suggestions, vec!["openai/gpt-4o".to_string()]);
    }
}

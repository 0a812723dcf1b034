//! Report Formatting
//!
//! Renders reports as a stable serializable shape for callers, or as a
//! markdown block for people. Both carry the same information.

use crate::agent::ValidatedConfig;
use crate::diagnostics::{Category, Diagnostic, DiagnosticKind, DiagnosticReport, Location, Severity};
use crate::error::CheckError;
use crate::validation::Schema;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Structured,
    Readable,
}

impl FormatMode {
    /// Parse a CLI `--format` value (`json` or `text`).
    pub fn parse(value: &str) -> Result<Self, CheckError> {
        match value {
            "json" | "structured" => Ok(FormatMode::Structured),
            "text" | "readable" | "markdown" => Ok(FormatMode::Readable),
            other => Err(CheckError::ConfigError(format!(
                "Invalid format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDiagnostic {
    pub kind: DiagnosticKind,
    pub error_type: Category,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl From<&Diagnostic> for StructuredDiagnostic {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            kind: diagnostic.kind,
            error_type: diagnostic.category(),
            severity: diagnostic.severity,
            location: diagnostic.location,
            message: diagnostic.message.clone(),
            suggestions: diagnostic.suggestions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub path: String,
    pub passed: bool,
    pub diagnostics: Vec<StructuredDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ValidatedConfig>,
}

pub fn to_structured(report: &DiagnosticReport) -> StructuredReport {
    StructuredReport {
        path: report.path().to_string(),
        passed: report.passed(),
        diagnostics: report.diagnostics().iter().map(Into::into).collect(),
        config: report.config().cloned(),
    }
}

pub fn format_report(report: &DiagnosticReport, mode: FormatMode) -> Result<String, CheckError> {
    match mode {
        FormatMode::Structured => Ok(serde_json::to_string_pretty(&to_structured(report))?),
        FormatMode::Readable => Ok(render_readable(report)),
    }
}

/// Several reports: a JSON array, or readable blocks separated by blank lines.
pub fn format_reports(reports: &[DiagnosticReport], mode: FormatMode) -> Result<String, CheckError> {
    match mode {
        FormatMode::Structured => {
            let structured: Vec<StructuredReport> = reports.iter().map(to_structured).collect();
            Ok(serde_json::to_string_pretty(&structured)?)
        }
        FormatMode::Readable => Ok(reports
            .iter()
            .map(render_readable)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

const SEVERITY_ORDER: [Severity; 3] = [Severity::Critical, Severity::Error, Severity::Warning];

/// Markdown rendering, grouped by severity with Critical first.
pub fn render_readable(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    let status = if report.passed() { "PASSED" } else { "FAILED" };
    out.push_str(&format!(
        "### {}: {} ({} critical, {} errors, {} warnings)\n\n",
        report.path(),
        status,
        report.count(Severity::Critical),
        report.count(Severity::Error),
        report.count(Severity::Warning)
    ));

    if report.diagnostics().is_empty() {
        out.push_str("No problems found.\n");
        return out;
    }

    for severity in SEVERITY_ORDER {
        let group: Vec<&Diagnostic> = report
            .diagnostics()
            .iter()
            .filter(|d| d.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("#### {}\n\n", severity.title()));
        for diagnostic in group {
            render_diagnostic(&mut out, diagnostic);
        }
        out.push('\n');
    }
    out
}

fn render_diagnostic(out: &mut String, diagnostic: &Diagnostic) {
    out.push_str(&format!(
        "- **{}** [{}] at {}: {}\n",
        diagnostic.kind,
        diagnostic.category().as_str(),
        diagnostic.location,
        indent_continuation(&diagnostic.message, 2)
    ));
    if diagnostic.suggestions.is_empty() {
        return;
    }
    out.push_str("  - Suggestions:\n");
    for suggestion in &diagnostic.suggestions {
        out.push_str(&format!("    - {}\n", indent_continuation(suggestion, 6)));
    }
}

/// Indent every line after the first so multi-line text stays inside its bullet.
fn indent_continuation(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut lines = text.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    out
}

/// Bold underlined heading when `color` is set, plain text otherwise.
fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

/// Per-document summary table for terminal output.
pub fn format_summary_text(reports: &[DiagnosticReport], color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Status", "Critical", "Errors", "Warnings"]);
    for report in reports {
        table.add_row(vec![
            report.path().to_string(),
            if report.passed() { "passed" } else { "failed" }.to_string(),
            report.count(Severity::Critical).to_string(),
            report.count(Severity::Error).to_string(),
            report.count(Severity::Warning).to_string(),
        ]);
    }
    let passed = reports.iter().filter(|r| r.passed()).count();
    format!(
        "{}\n\n{}\n\n{} of {} documents passed\n",
        heading("Summary", color),
        table,
        passed,
        reports.len()
    )
}

/// Schema field table: one row per field in declaration order.
pub fn format_schema(schema: &Schema, mode: FormatMode, color: bool) -> Result<String, CheckError> {
    match mode {
        FormatMode::Structured => {
            let fields: Vec<serde_json::Value> = schema
                .fields
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "field": f.name,
                        "required": f.required,
                        "shape": f.shape.describe(),
                        "example": f.example,
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "version": schema.version,
                "fields": fields,
            }))?)
        }
        FormatMode::Readable => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Field", "Required", "Shape", "Example"]);
            for f in &schema.fields {
                table.add_row(vec![
                    f.name.to_string(),
                    if f.required { "yes" } else { "no" }.to_string(),
                    f.shape.describe().to_string(),
                    f.example.to_string(),
                ]);
            }
            Ok(format!(
                "{}\n\n{}\n",
                heading(&format!("Agent schema (version {})", schema.version), color),
                table
            ))
        }
    }
}

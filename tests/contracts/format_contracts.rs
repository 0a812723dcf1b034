use agentcheck::format::{format_reports, render_readable};
use agentcheck::{format_report, validate_document, FormatMode, ValidationOptions};

use crate::contracts::support::{doc, fragments, registry, VALID_AGENT};

const BROKEN_AGENT: &str = "---\n\
name: a\n\
tool: [web_search]\n\
tools: web_search\n\
model: gpt-4o\n\
---\n\
{% include \"shared/tones\" %}\n";

fn report(text: &str) -> agentcheck::DiagnosticReport {
    validate_document(&doc(text), &registry(), &fragments(), &ValidationOptions::default()).unwrap()
}

#[test]
fn structured_report_json_contract_has_required_fields() {
    let output = format_report(&report(BROKEN_AGENT), FormatMode::Structured).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed.get("path").and_then(|v| v.as_str()), Some("agents/test.md"));
    assert_eq!(parsed.get("passed").and_then(|v| v.as_bool()), Some(false));
    assert!(parsed.get("config").is_none());

    let diagnostics = parsed
        .get("diagnostics")
        .and_then(|v| v.as_array())
        .expect("diagnostics array should exist");
    assert!(!diagnostics.is_empty());
    for entry in diagnostics {
        assert!(entry.get("kind").and_then(|v| v.as_str()).is_some());
        assert!(entry.get("error_type").and_then(|v| v.as_str()).is_some());
        assert!(entry.get("severity").and_then(|v| v.as_str()).is_some());
        assert!(entry.get("message").and_then(|v| v.as_str()).is_some());
        assert!(entry.get("suggestions").and_then(|v| v.as_array()).is_some());
        let location = entry.get("location").expect("location should exist");
        assert!(location.get("line").and_then(|v| v.as_u64()).is_some());
    }
}

#[test]
fn passing_report_serializes_its_config() {
    let output = format_report(&report(VALID_AGENT), FormatMode::Structured).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["passed"], true);
    assert_eq!(parsed["config"]["name"], "research-assistant");
    assert_eq!(parsed["config"]["tools"][1], "file_reader");
}

#[test]
fn readable_output_is_deterministic_and_complete() {
    let first = render_readable(&report(BROKEN_AGENT));
    assert_eq!(first, render_readable(&report(BROKEN_AGENT)));

    let broken = report(BROKEN_AGENT);
    for diagnostic in broken.diagnostics() {
        assert!(first.contains(diagnostic.kind.as_str()));
        assert!(first.contains(&diagnostic.location.to_string()));
        for line in diagnostic.message.lines() {
            assert!(first.contains(line.trim()), "missing message line: {}", line);
        }
    }
    assert!(first.contains("FAILED"));
}

#[test]
fn readable_lists_critical_before_warnings() {
    let text = render_readable(&report(BROKEN_AGENT));
    let critical = text.find("#### Critical").expect("critical section");
    let warnings = text.find("#### Warnings").expect("warnings section");
    assert!(critical < warnings);
}

#[test]
fn batch_json_is_an_array_in_input_order() {
    let reports = vec![report(VALID_AGENT), report(BROKEN_AGENT)];
    let parsed: serde_json::Value =
        serde_json::from_str(&format_reports(&reports, FormatMode::Structured).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["passed"], true);
    assert_eq!(items[1]["passed"], false);
}

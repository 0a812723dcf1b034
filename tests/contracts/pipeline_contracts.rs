use agentcheck::document::decode_header;
use agentcheck::validation::edit_distance;
use agentcheck::{
    format_report, validate_document, validate_documents, DiagnosticKind, FormatMode,
    FragmentRegistry, RawDocument, Registry, Severity, ValidationOptions,
};

use crate::contracts::support::{doc, fragments, registry, REGISTRY_TOML, VALID_AGENT};

fn check(text: &str) -> agentcheck::DiagnosticReport {
    validate_document(&doc(text), &registry(), &fragments(), &ValidationOptions::default()).unwrap()
}

#[test]
fn happy_path_has_no_diagnostics_and_a_config() {
    let report = check(VALID_AGENT);
    assert!(report.diagnostics().is_empty(), "{:?}", report.diagnostics());
    assert!(report.passed());

    let config = report.config().expect("passing report carries a config");
    assert_eq!(config.name, "research-assistant");
    assert_eq!(config.model.as_deref(), Some("openai/gpt-4o"));
    assert_eq!(config.server_names(), vec!["filesystem", "github"]);
    assert_eq!(config.max_tokens, Some(2048));
}

#[test]
fn config_round_trips_decoded_header_values() {
    let report = check(VALID_AGENT);
    let config = report.config().unwrap();

    let header = VALID_AGENT
        .trim_start_matches("---\n")
        .split("\n---\n")
        .next()
        .unwrap();
    let tree = decode_header(header, 2).unwrap();

    let config_json = serde_json::to_value(config).unwrap();
    let tree_json = serde_json::to_value(tree.to_yaml()).unwrap();
    assert_eq!(config_json, tree_json);
}

#[test]
fn integer_values_and_numeric_keys_round_trip() {
    let text = "---\nname: a\ndescription: b\ntemperature: 1\nmetadata:\n  1: x\n  owner: docs\n---\n";
    let report = check(text);
    assert!(report.diagnostics().is_empty(), "{:?}", report.diagnostics());
    let config = report.config().unwrap();

    let tree = decode_header("name: a\ndescription: b\ntemperature: 1\nmetadata:\n  1: x\n  owner: docs\n", 2)
        .unwrap();
    assert_eq!(serde_yaml::to_value(config).unwrap(), tree.to_yaml());
    assert_eq!(
        serde_json::to_value(config).unwrap(),
        serde_json::to_value(tree.to_yaml()).unwrap()
    );
    assert_eq!(serde_json::to_value(config).unwrap()["temperature"], serde_json::json!(1));
}

#[test]
fn validation_is_deterministic() {
    let text = "---\nname: a\ntool: [x]\ntools: [web_serch, cod_exec]\nmodel: gpt-4o\n---\n{% include \"shared/tones\" %}\n";
    let first = format_report(&check(text), FormatMode::Structured).unwrap();
    for _ in 0..5 {
        assert_eq!(format_report(&check(text), FormatMode::Structured).unwrap(), first);
    }
}

#[test]
fn suggestions_respect_distance_and_count_bounds() {
    let options = ValidationOptions::default();
    let report = check("---\nname: a\ndescription: b\ntools: [web_serch, fil_reader, zzz]\n---\n");
    let capabilities: Vec<_> = report
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnknownCapability)
        .collect();
    assert_eq!(capabilities.len(), 3);

    let inputs = ["web_serch", "fil_reader", "zzz"];
    for (diagnostic, input) in capabilities.iter().zip(inputs) {
        assert!(diagnostic.suggestions.len() <= options.max_results);
        for suggestion in &diagnostic.suggestions {
            assert!(edit_distance(input, suggestion) <= options.max_distance);
        }
    }
    assert_eq!(capabilities[0].suggestions, vec!["web_search".to_string()]);
    assert!(capabilities[2].suggestions.is_empty());
}

#[test]
fn syntax_failure_yields_exactly_one_diagnostic() {
    let report = check("---\nname: a\ntools: [web_search\n---\n{% include \"missing\" %}\n");
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].kind, DiagnosticKind::SyntaxError);
    assert!(report.config().is_none());

    let report = check("name: a\ndescription: b\n");
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].kind, DiagnosticKind::MissingFrontmatterDelimiter);
}

#[test]
fn missing_required_field_is_critical_and_blocks_config() {
    let report = check("---\nname: research-assistant\n---\nBody\n");
    let missing: Vec<_> = report
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::MissingRequiredField)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::Critical);
    assert!(missing[0].message.contains("description"));
    assert!(!report.passed());
    assert!(report.config().is_none());
}

#[test]
fn bare_model_gets_prefixed_suggestion() {
    let report = check("---\nname: a\ndescription: b\nmodel: gpt-4o\n---\n");
    assert_eq!(report.diagnostics().len(), 1);
    let diagnostic = &report.diagnostics()[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingModelPrefix);
    assert_eq!(diagnostic.location.line, 4);
    assert!(diagnostic.suggestions.contains(&"openai/gpt-4o".to_string()));
}

#[test]
fn unknown_model_under_known_prefix_does_not_block() {
    let report = check("---\nname: a\ndescription: b\nmodel: openai/gpt-5\n---\n");
    assert_eq!(report.diagnostics()[0].kind, DiagnosticKind::UnknownModelForPrefix);
    assert_eq!(report.diagnostics()[0].severity, Severity::Warning);
    assert!(report.passed());

    let strict = ValidationOptions {
        model_drift_severity: Severity::Error,
        ..ValidationOptions::default()
    };
    let report = validate_document(
        &doc("---\nname: a\ndescription: b\nmodel: openai/gpt-5\n---\n"),
        &registry(),
        &fragments(),
        &strict,
    )
    .unwrap();
    assert!(!report.passed());
}

#[test]
fn missing_include_reports_body_position() {
    let report = check(
        "---\nname: a\ndescription: b\n---\nIntro\n\nSee {% include \"shared/tones\" %} here\n",
    );
    assert_eq!(report.diagnostics().len(), 1);
    let diagnostic = &report.diagnostics()[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingIncludeFragment);
    assert_eq!(diagnostic.location.line, 7);
    assert_eq!(diagnostic.location.column, Some(5));
    assert!(diagnostic.suggestions.contains(&"shared/tone".to_string()));
}

#[test]
fn registry_snapshot_matches_programmatic_registry() {
    assert_eq!(Registry::from_toml_str(REGISTRY_TOML).unwrap(), registry());
}

#[test]
fn batch_validation_keeps_order_and_isolation() {
    let documents = vec![
        RawDocument::new("a.md", VALID_AGENT),
        RawDocument::new("b.md", "no frontmatter here"),
        RawDocument::new("c.md", "---\nname: c\n---\n"),
    ];
    let reports = validate_documents(
        &documents,
        &registry(),
        &FragmentRegistry::new(["shared/tone"]),
        &ValidationOptions::default(),
        3,
    )
    .unwrap();
    let paths: Vec<&str> = reports.iter().map(|r| r.path()).collect();
    assert_eq!(paths, vec!["a.md", "b.md", "c.md"]);
    assert_eq!(
        reports.iter().map(|r| r.passed()).collect::<Vec<_>>(),
        vec![true, false, false]
    );
}

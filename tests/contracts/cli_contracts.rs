use agentcheck::config::CheckerConfig;
use agentcheck::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

use crate::contracts::support::{write, REGISTRY_TOML, VALID_AGENT};

fn context() -> CliContext {
    CliContext::with_config(CheckerConfig {
        workers: 2,
        ..CheckerConfig::default()
    })
}

fn check_command(temp: &TempDir, paths: Vec<std::path::PathBuf>, format: &str) -> Commands {
    Commands::Check {
        paths,
        registry: Some(write(temp.path(), "registry.toml", REGISTRY_TOML)),
        fragments: Some(temp.path().join("fragments")),
        format: format.to_string(),
        workers: None,
    }
}

#[test]
fn check_directory_json_contract() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "fragments/shared/tone.md", "Be kind.");
    write(temp.path(), "agents/b.md", "---\nname: b\n---\n");
    write(temp.path(), "agents/a.md", VALID_AGENT);
    write(temp.path(), "agents/notes.txt", "ignored");

    let command = check_command(&temp, vec![temp.path().join("agents")], "json");
    let output = context().execute(&command).unwrap();
    assert!(!output.passed);

    let parsed: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    let reports = parsed.as_array().expect("array of reports");
    assert_eq!(reports.len(), 2);
    assert!(reports[0]["path"].as_str().unwrap().ends_with("a.md"));
    assert_eq!(reports[0]["passed"], true);
    assert_eq!(reports[1]["passed"], false);
    assert_eq!(reports[1]["diagnostics"][0]["kind"], "MissingRequiredField");
}

#[test]
fn check_text_includes_summary_table() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "fragments/shared/tone.md", "Be kind.");
    let agent = write(temp.path(), "agents/a.md", VALID_AGENT);

    let output = context()
        .execute(&check_command(&temp, vec![agent], "text"))
        .unwrap();
    assert!(output.passed);
    assert!(output.text.contains("PASSED"));
    assert!(output.text.contains("1 of 1 documents passed"));
    assert!(!output.text.contains('\u{1b}'));
}

#[test]
fn schema_text_is_plain_unless_color_is_requested() {
    let command = Commands::Schema {
        format: "text".to_string(),
    };
    let plain = context().execute(&command).unwrap();
    assert!(plain.text.starts_with("Agent schema (version 1)"));
    assert!(!plain.text.contains('\u{1b}'));

    let styled = context().with_color(true).execute(&command).unwrap();
    assert!(styled.text.contains('\u{1b}'));
}

#[test]
fn missing_path_is_an_operational_error() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("fragments")).unwrap();
    let command = check_command(&temp, vec![temp.path().join("absent.md")], "json");
    assert!(context().execute(&command).is_err());
}

#[test]
fn unknown_format_is_rejected() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("fragments")).unwrap();
    let agent = write(temp.path(), "a.md", VALID_AGENT);
    assert!(context()
        .execute(&check_command(&temp, vec![agent], "yaml"))
        .is_err());
}

#[test]
fn schema_command_lists_fields() {
    let output = context()
        .execute(&Commands::Schema {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    let fields = parsed["fields"].as_array().unwrap();
    assert!(fields.iter().any(|f| f["field"] == "description" && f["required"] == true));
    assert!(fields.iter().any(|f| f["field"] == "mcp_servers" && f["required"] == false));
}

//! YAML decoding of the frontmatter header.

use super::spans::SpanLocator;
use super::tree::ConfigTree;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use serde_yaml::Value;

/// Checklist attached to every syntax diagnostic.
pub const SYNTAX_CHECKLIST: [&str; 4] = [
    "Balance every bracket and quote: `tools: [web_search, file_reader]`",
    "Indent nested values consistently with spaces, never tabs:\nmcp_servers:\n  - name: filesystem",
    "Follow every key with a colon and a space: `description: Answers questions`",
    "Start each list item with `- ` on its own line:\ntools:\n  - web_search",
];

/// Decode the header into a spanned tree.
///
/// Line numbers in the returned diagnostic are absolute file lines.
pub fn decode_header(header_text: &str, header_start_line: usize) -> Result<ConfigTree, Diagnostic> {
    let value: Value = serde_yaml::from_str(header_text)
        .map_err(|e| syntax_diagnostic(&e, header_text, header_start_line))?;

    let locator = SpanLocator::new(header_text, header_start_line);
    let whole = locator.whole();
    let mapping = match value {
        Value::Null => serde_yaml::Mapping::new(),
        Value::Mapping(mapping) => mapping,
        Value::Tagged(tagged) if tagged.value.is_mapping() => match tagged.value {
            Value::Mapping(mapping) => mapping,
            _ => serde_yaml::Mapping::new(),
        },
        other => {
            return Err(Diagnostic::new(
                DiagnosticKind::SyntaxError,
                Location::line(header_start_line),
                format!(
                    "The frontmatter must be a set of `key: value` pairs, but it decoded to a {}.",
                    value_shape(&other)
                ),
            )
            .with_suggestions(SYNTAX_CHECKLIST));
        }
    };

    let nodes = locator.build_entries(&mapping, whole, 0);
    Ok(ConfigTree::new(nodes, locator.span_of(whole)))
}

fn value_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "plain string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn syntax_diagnostic(error: &serde_yaml::Error, header_text: &str, header_start_line: usize) -> Diagnostic {
    let complaint = strip_positions(&error.to_string());
    let lines: Vec<&str> = header_text.lines().collect();

    let Some(position) = error.location() else {
        return Diagnostic::new(
            DiagnosticKind::SyntaxError,
            Location::line(header_start_line),
            format!("Invalid YAML in frontmatter: {}", complaint),
        )
        .with_suggestions(SYNTAX_CHECKLIST);
    };

    // Errors at end of input point one past the last line.
    let relative = position.line().clamp(1, lines.len().max(1));
    let absolute = relative + header_start_line - 1;
    let offending = lines.get(relative - 1).copied().unwrap_or("");

    Diagnostic::new(
        DiagnosticKind::SyntaxError,
        Location::at(absolute, position.column()),
        format!(
            "Invalid YAML in frontmatter at line {}, column {}:\n    {}\n{}",
            absolute,
            position.column(),
            offending,
            complaint
        ),
    )
    .with_suggestions(SYNTAX_CHECKLIST)
}

/// serde_yaml embeds header-relative positions (`at line L column C`) after
/// the problem and after its `while ...` context; drop all of them in favor of
/// the file position reported by the diagnostic.
fn strip_positions(message: &str) -> String {
    const MARKER: &str = " at line ";
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(index) = rest.find(MARKER) {
        out.push_str(&rest[..index]);
        let tail = &rest[index + MARKER.len()..];
        let Some(after_line) = skip_digits(tail) else {
            out.push_str(MARKER);
            rest = tail;
            continue;
        };
        rest = after_line
            .strip_prefix(" column ")
            .and_then(skip_digits)
            .unwrap_or(after_line);
    }
    out.push_str(rest);
    out
}

/// Text after a leading run of ASCII digits, or `None` if there is no digit.
fn skip_digits(text: &str) -> Option<&str> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    (end > 0).then(|| &text[end..])
}

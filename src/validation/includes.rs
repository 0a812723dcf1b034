//! Include-token checks over the instruction body.
//!
//! Only `{% include "name" %}` tokens are recognized; any other template
//! syntax in the body is left alone.

use super::fuzzy::fuzzy_match;
use super::ValidationOptions;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use crate::registry::FragmentRegistry;

const TOKEN_OPEN: &str = "{%";
const TOKEN_CLOSE: &str = "%}";
const INCLUDE_KEYWORD: &str = "include";

/// An include token found in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeReference {
    /// Fragment identifier with any file extension removed.
    pub name: String,
    /// Name exactly as written in the token.
    pub raw: String,
    pub line: usize,
    pub column: usize,
}

/// Find include tokens in one pass over the body. `body_start_line` is the
/// file line of the first body line.
pub fn scan_includes(body_text: &str, body_start_line: usize) -> Vec<IncludeReference> {
    let mut references = Vec::new();
    for (offset, line) in body_text.lines().enumerate() {
        let mut rest = line;
        let mut consumed = 0;
        while let Some(start) = rest.find(TOKEN_OPEN) {
            let token = &rest[start..];
            match parse_include(token) {
                Some((raw, length)) => {
                    let byte_column = consumed + start;
                    references.push(IncludeReference {
                        name: strip_extension(raw).to_string(),
                        raw: raw.to_string(),
                        line: body_start_line + offset,
                        column: line[..byte_column].chars().count() + 1,
                    });
                    consumed += start + length;
                    rest = &rest[start + length..];
                }
                None => {
                    consumed += start + TOKEN_OPEN.len();
                    rest = &rest[start + TOKEN_OPEN.len()..];
                }
            }
        }
    }
    references
}

/// Parse `{% include "name" %}` at the start of `token`; returns the quoted
/// name and the token's byte length.
fn parse_include(token: &str) -> Option<(&str, usize)> {
    let inner = token.strip_prefix(TOKEN_OPEN)?;
    let inner = inner.strip_prefix('-').unwrap_or(inner).trim_start();
    let inner = inner.strip_prefix(INCLUDE_KEYWORD)?;
    if !inner.starts_with(char::is_whitespace) {
        return None;
    }
    let inner = inner.trim_start();
    let quote = inner.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &inner[quote.len_utf8()..];
    let end = inner.find(quote)?;
    let name = &inner[..end];
    if name.trim().is_empty() {
        return None;
    }
    let after = inner[end + quote.len_utf8()..].trim_start();
    let after = after.strip_prefix('-').unwrap_or(after);
    if !after.starts_with(TOKEN_CLOSE) {
        return None;
    }
    let remaining = after.len() - TOKEN_CLOSE.len();
    Some((name.trim(), token.len() - remaining))
}

/// `shared/tone.md` -> `shared/tone`; only the last path component is touched.
fn strip_extension(name: &str) -> &str {
    let file_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &name[..file_start + dot],
        _ => name,
    }
}

/// Report every include token whose fragment is not registered.
pub fn check_includes(
    body_text: &str,
    body_start_line: usize,
    fragments: &FragmentRegistry,
    options: &ValidationOptions,
) -> Vec<Diagnostic> {
    scan_includes(body_text, body_start_line)
        .into_iter()
        .filter(|reference| !fragments.contains(&reference.name))
        .map(|reference| {
            let suggestions = fuzzy_match(
                &reference.name,
                fragments.names(),
                options.max_distance,
                options.max_results,
            );
            let mut message = format!(
                "Included fragment `{}` does not exist.",
                reference.raw
            );
            match suggestions.first() {
                Some(best) => message.push_str(&format!(
                    " Did you mean `{{% include \"{}\" %}}`?",
                    best
                )),
                None if fragments.is_empty() => {
                    message.push_str(" No fragments are available to include.")
                }
                None => message.push_str(" Check the fragment name and that the file exists."),
            }
            Diagnostic::new(
                DiagnosticKind::MissingIncludeFragment,
                Location::at(reference.line, reference.column),
                message,
            )
            .with_suggestions(suggestions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tokens_with_positions() {
        let body = "Intro\n  {% include \"tone\" %} and {%- include 'shared/safety.md' -%}\n";
        let found = scan_includes(body, 5);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "tone");
        assert_eq!((found[0].line, found[0].column), (6, 3));
        assert_eq!(found[1].name, "shared/safety");
        assert_eq!(found[1].raw, "shared/safety.md");
        assert_eq!(found[1].line, 6);
        assert_eq!(found[1].column, 28);
    }

    #[test]
    fn ignores_other_template_syntax() {
        let body = "{% if x %}hi{% endif %} {{ include }} {% include %} {% includes \"a\" %}";
        assert!(scan_includes(body, 1).is_empty());
    }

    #[test]
    fn strip_extension_only_touches_file_name() {
        assert_eq!(strip_extension("a.b/c"), "a.b/c");
        assert_eq!(strip_extension("a/c.md"), "a/c");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }

    #[test]
    fn missing_fragment_is_reported_at_token() {
        let fragments = FragmentRegistry::new(["tone", "safety"]);
        let body = "Be helpful.\n\n{% include \"tonne\" %}\n{% include \"safety\" %}\n";
        let findings = check_includes(body, 6, &fragments, &ValidationOptions::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, DiagnosticKind::MissingIncludeFragment);
        assert_eq!(findings[0].location, Location::at(8, 1));
        assert_eq!(findings[0].suggestions, vec!["tone".to_string()]);
    }

    #[test]
    fn non_ascii_text_keeps_char_columns() {
        let body = "héllo {% include \"x\" %}";
        let found = scan_includes(body, 1);
        assert_eq!(found[0].column, 7);
    }
}

//! Frontmatter splitting.
//!
//! An agent document is a `---` delimited YAML header followed by free-form
//! body text. Line numbers recorded here let later stages report positions in
//! the original file rather than in the extracted header.

use super::RawDocument;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};

pub const FRONTMATTER_DELIMITER: &str = "---";

/// Skeleton shown to the user when the document has no frontmatter at all.
pub const FRONTMATTER_TEMPLATE: &str = "\
---
name: research-assistant
description: Answers questions using web search
model: openai/gpt-4o
tools:
  - web_search
---

You are a careful research assistant...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub header_text: String,
    /// 1-based file line of the first header line.
    pub header_start_line: usize,
    pub body_text: String,
    /// 1-based file line of the first body line.
    pub body_start_line: usize,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == FRONTMATTER_DELIMITER
}

/// Split a document into header and body.
pub fn split_frontmatter(document: &RawDocument) -> Result<Frontmatter, Diagnostic> {
    let text = document
        .text
        .strip_prefix('\u{feff}')
        .unwrap_or(&document.text);
    let lines: Vec<&str> = text.split_inclusive('\n').collect();

    if !lines.first().map(|l| is_delimiter(l)).unwrap_or(false) {
        return Err(missing_delimiter(&lines));
    }

    let closing = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| is_delimiter(line))
        .map(|(index, _)| index);

    let Some(closing) = closing else {
        return Err(Diagnostic::new(
            DiagnosticKind::UnterminatedFrontmatter,
            Location::line(1),
            format!(
                "The frontmatter opened with `{}` on line 1 is never closed. \
                 Add a line containing only `{}` after the last header field.",
                FRONTMATTER_DELIMITER, FRONTMATTER_DELIMITER
            ),
        )
        .with_suggestions([format!(
            "Close the header before the instructions:\n{}",
            FRONTMATTER_TEMPLATE
        )]));
    };

    Ok(Frontmatter {
        header_text: lines[1..closing].concat(),
        header_start_line: 2,
        body_text: lines[closing + 1..].concat(),
        body_start_line: closing + 2,
    })
}

fn missing_delimiter(lines: &[&str]) -> Diagnostic {
    let mut suggestions = Vec::new();
    if let Some(index) = lines.iter().position(|l| is_delimiter(l)) {
        suggestions.push(format!(
            "Remove the {} line(s) before the `{}` on line {}; the delimiter must be the very first line",
            index,
            FRONTMATTER_DELIMITER,
            index + 1
        ));
    }
    suggestions.push(format!(
        "Add a line containing only `{}` as the first line, the header fields, then another `{}` line",
        FRONTMATTER_DELIMITER, FRONTMATTER_DELIMITER
    ));

    Diagnostic::new(
        DiagnosticKind::MissingFrontmatterDelimiter,
        Location::line(1),
        format!(
            "Agent files must start with a `{}` line that opens the YAML frontmatter. \
             Expected structure:\n\n{}",
            FRONTMATTER_DELIMITER, FRONTMATTER_TEMPLATE
        ),
    )
    .with_suggestions(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> RawDocument {
        RawDocument::new("agent.md", text)
    }

    #[test]
    fn splits_header_and_body() {
        let fm = split_frontmatter(&doc("---\nname: a\ndescription: b\n---\nBody\nmore\n")).unwrap();
        assert_eq!(fm.header_text, "name: a\ndescription: b\n");
        assert_eq!(fm.header_start_line, 2);
        assert_eq!(fm.body_text, "Body\nmore\n");
        assert_eq!(fm.body_start_line, 5);
    }

    #[test]
    fn tolerates_crlf_and_bom() {
        let fm = split_frontmatter(&doc("\u{feff}---\r\nname: a\r\n---  \r\nBody")).unwrap();
        assert_eq!(fm.header_text, "name: a\r\n");
        assert_eq!(fm.body_text, "Body");
    }

    #[test]
    fn empty_header_is_allowed_here() {
        let fm = split_frontmatter(&doc("---\n---\n")).unwrap();
        assert!(fm.header_text.is_empty());
        assert!(fm.body_text.is_empty());
        assert_eq!(fm.body_start_line, 3);
    }

    #[test]
    fn missing_opening_delimiter_shows_template() {
        let err = split_frontmatter(&doc("name: a\n")).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::MissingFrontmatterDelimiter);
        assert!(err.message.contains(FRONTMATTER_TEMPLATE));
        assert_eq!(err.location.line, 1);
    }

    #[test]
    fn late_delimiter_is_pointed_out() {
        let err = split_frontmatter(&doc("\n---\nname: a\n---\n")).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::MissingFrontmatterDelimiter);
        assert!(err.suggestions[0].contains("line 2"));
    }

    #[test]
    fn empty_document_is_missing_delimiter() {
        let err = split_frontmatter(&doc("")).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::MissingFrontmatterDelimiter);
    }

    #[test]
    fn unterminated_points_at_opening_line() {
        let err = split_frontmatter(&doc("---\nname: a\ndescription: b\n")).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnterminatedFrontmatter);
        assert_eq!(err.location.line, 1);
    }
}

//! Span recovery by re-scanning header lines.
//!
//! `serde_yaml` values carry no positions, so spans are re-derived by matching
//! key tokens and list markers line by line. Keys are matched in document
//! order, one nesting level at a time. The result is line-accurate at best and
//! falls back to the enclosing node's span when a token cannot be found.

use super::tree::{ConfigNode, MappingEntry, NodeValue, SourceSpan};
use serde_yaml::{Mapping, Value};

pub(crate) struct SpanLocator<'a> {
    lines: Vec<&'a str>,
    first_line: usize,
}

/// Inclusive range of header line indices (0-based).
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineRange {
    start: usize,
    end: usize,
}

impl<'a> SpanLocator<'a> {
    pub(crate) fn new(header_text: &'a str, header_start_line: usize) -> Self {
        Self {
            lines: header_text.lines().collect(),
            first_line: header_start_line,
        }
    }

    pub(crate) fn whole(&self) -> LineRange {
        LineRange {
            start: 0,
            end: self.lines.len().saturating_sub(1),
        }
    }

    pub(crate) fn span_of(&self, range: LineRange) -> SourceSpan {
        let mut end = range.end.min(self.lines.len().saturating_sub(1));
        while end > range.start && is_blank_or_comment(self.lines[end]) {
            end -= 1;
        }
        SourceSpan::new(self.first_line + range.start, self.first_line + end)
    }

    /// Find `key:` at or after `from`, optionally pinned to one indentation.
    fn find_key(
        &self,
        key: &str,
        from: usize,
        to: usize,
        indent: Option<usize>,
    ) -> Option<(usize, usize)> {
        (from..=to.min(self.lines.len().saturating_sub(1)))
            .filter_map(|index| {
                let line = self.lines.get(index)?;
                match_key(line, key).map(|found| (index, found))
            })
            .find(|(_, found)| indent.map(|i| i == *found).unwrap_or(true))
    }

    /// Lines of block sequence items within a range, at the first item's indent.
    fn sequence_items(&self, from: usize, to: usize) -> Vec<usize> {
        let mut indent = None;
        let mut items = Vec::new();
        for index in from..=to.min(self.lines.len().saturating_sub(1)) {
            let Some(found) = self.lines.get(index).and_then(|l| list_marker_indent(l)) else {
                continue;
            };
            match indent {
                None => {
                    indent = Some(found);
                    items.push(index);
                }
                Some(level) if level == found => items.push(index),
                _ => {}
            }
        }
        items
    }

    /// Build a spanned node for `value` occupying `range`. When `keyed`, the
    /// first line of the range holds the node's own key.
    pub(crate) fn build(&self, value: &Value, range: LineRange, keyed: bool) -> ConfigNode {
        let span = self.span_of(range);
        let content_start = if keyed { range.start + 1 } else { range.start };
        let value = match value {
            Value::Null => NodeValue::Null,
            Value::Bool(b) => NodeValue::Bool(*b),
            Value::Number(n) => NodeValue::Number(n.clone()),
            Value::String(s) => NodeValue::String(s.clone()),
            Value::Sequence(items) => {
                NodeValue::Sequence(self.build_sequence(items, range, content_start))
            }
            Value::Mapping(mapping) => {
                NodeValue::Mapping(self.build_entries(mapping, range, content_start))
            }
            Value::Tagged(tagged) => return self.build(&tagged.value, range, keyed),
        };
        ConfigNode { value, span }
    }

    fn build_sequence(
        &self,
        items: &[Value],
        range: LineRange,
        content_start: usize,
    ) -> Vec<ConfigNode> {
        let markers = if content_start <= range.end {
            self.sequence_items(content_start, range.end)
        } else {
            Vec::new()
        };

        if markers.len() != items.len() {
            // Flow style or unrecognized layout: items share the parent's span.
            return items
                .iter()
                .map(|item| self.build(item, range, true))
                .collect();
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let end = markers
                    .get(i + 1)
                    .map(|next| next - 1)
                    .unwrap_or(range.end);
                self.build(
                    item,
                    LineRange {
                        start: markers[i],
                        end,
                    },
                    false,
                )
            })
            .collect()
    }

    pub(crate) fn build_entries(
        &self,
        mapping: &Mapping,
        range: LineRange,
        content_start: usize,
    ) -> Vec<MappingEntry> {
        let entries: Vec<(&Value, String, &Value)> = mapping
            .iter()
            .map(|(key, value)| (key, key_text(key), value))
            .collect();
        let mut level_indent = None;
        let mut cursor = content_start;
        let mut positions = Vec::with_capacity(entries.len());
        for (_, name, _) in &entries {
            let found = if cursor <= range.end {
                self.find_key(name, cursor, range.end, level_indent)
            } else {
                None
            };
            match found {
                Some((index, indent)) => {
                    level_indent.get_or_insert(indent);
                    cursor = index + 1;
                    positions.push(Some(index));
                }
                None => positions.push(None),
            }
        }

        entries
            .into_iter()
            .enumerate()
            .map(|(i, (key, name, value))| {
                let node = match positions[i] {
                    Some(start) => {
                        let end = positions[i + 1..]
                            .iter()
                            .flatten()
                            .next()
                            .map(|next| next - 1)
                            .unwrap_or(range.end);
                        self.build(value, LineRange { start, end }, true)
                    }
                    None => self.build(value, range, true),
                };
                MappingEntry {
                    key: key.clone(),
                    name,
                    node,
                }
            })
            .collect()
    }
}

/// Text used to match a mapping key against the header lines.
pub(crate) fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Strip indentation and any `- ` list markers; returns (column offset, rest).
fn strip_markers(line: &str) -> (usize, &str) {
    let mut rest = line.trim_start_matches([' ', '\t']);
    loop {
        if let Some(after) = rest.strip_prefix('-') {
            if after.starts_with(' ') || after.starts_with('\t') {
                rest = after.trim_start_matches([' ', '\t']);
                continue;
            }
        }
        break;
    }
    (line.len() - rest.len(), rest)
}

/// Indent at which `key:` starts on this line, if the line declares it.
fn match_key(line: &str, key: &str) -> Option<usize> {
    if is_blank_or_comment(line) {
        return None;
    }
    let (indent, rest) = strip_markers(line);
    let after = [
        rest.strip_prefix(key),
        rest.strip_prefix('"')
            .and_then(|r| r.strip_prefix(key))
            .and_then(|r| r.strip_prefix('"')),
        rest.strip_prefix('\'')
            .and_then(|r| r.strip_prefix(key))
            .and_then(|r| r.strip_prefix('\'')),
    ]
    .into_iter()
    .flatten()
    .find_map(|r| r.trim_start_matches([' ', '\t']).strip_prefix(':'))?;

    (after.is_empty() || after.starts_with(' ') || after.starts_with('\t')).then_some(indent)
}

fn list_marker_indent(line: &str) -> Option<usize> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let after = trimmed.strip_prefix('-')?;
    (after.is_empty() || after.starts_with(' ') || after.starts_with('\t'))
        .then_some(line.len() - trimmed.len())
}

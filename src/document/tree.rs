//! Decoded header tree with per-node source spans.

use serde_yaml::{Mapping, Number, Value};

/// Inclusive 1-based line range in the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl SourceSpan {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line: end_line.max(start_line),
        }
    }
}

/// One mapping entry. `key` is the decoded key; `name` is its text, used for
/// schema lookups and for finding the key in the header lines.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: Value,
    pub name: String,
    pub node: ConfigNode,
}

impl MappingEntry {
    /// The key as a string, or `None` for numeric, boolean, or other keys.
    pub fn key_str(&self) -> Option<&str> {
        self.key.as_str()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<ConfigNode>),
    Mapping(Vec<MappingEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    pub value: NodeValue,
    pub span: SourceSpan,
}

impl ConfigNode {
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match &self.value {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
        match &self.value {
            NodeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a string key when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        find_entry(self.as_mapping()?, key)
    }

    pub fn is_integer(&self) -> bool {
        matches!(&self.value, NodeValue::Number(n) if n.is_i64() || n.is_u64())
    }

    /// Name of the runtime shape, as shown in type diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match &self.value {
            NodeValue::Null => "null",
            NodeValue::Bool(_) => "boolean",
            NodeValue::Number(n) if n.is_f64() => "number",
            NodeValue::Number(_) => "integer",
            NodeValue::String(_) => "string",
            NodeValue::Sequence(_) => "list",
            NodeValue::Mapping(_) => "mapping",
        }
    }

    /// Convert back into a plain YAML value, dropping spans.
    pub fn to_yaml(&self) -> Value {
        match &self.value {
            NodeValue::Null => Value::Null,
            NodeValue::Bool(b) => Value::Bool(*b),
            NodeValue::Number(n) => Value::Number(n.clone()),
            NodeValue::String(s) => Value::String(s.clone()),
            NodeValue::Sequence(items) => {
                Value::Sequence(items.iter().map(ConfigNode::to_yaml).collect())
            }
            NodeValue::Mapping(entries) => Value::Mapping(entries_to_mapping(entries)),
        }
    }
}

fn find_entry<'a>(entries: &'a [MappingEntry], key: &str) -> Option<&'a ConfigNode> {
    entries
        .iter()
        .find(|entry| entry.key_str() == Some(key))
        .map(|entry| &entry.node)
}

/// Rebuild a YAML mapping from entries, keeping the decoded keys.
pub(crate) fn entries_to_mapping<'a, I>(entries: I) -> Mapping
where
    I: IntoIterator<Item = &'a MappingEntry>,
{
    entries
        .into_iter()
        .map(|entry| (entry.key.clone(), entry.node.to_yaml()))
        .collect()
}

/// Ordered top-level mapping of the frontmatter header.
///
/// Built once by the decoder; validators only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    entries: Vec<MappingEntry>,
    span: SourceSpan,
}

impl ConfigTree {
    pub(crate) fn new(entries: Vec<MappingEntry>, span: SourceSpan) -> Self {
        Self { entries, span }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        find_entry(&self.entries, key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_yaml(&self) -> Value {
        Value::Mapping(entries_to_mapping(&self.entries))
    }
}

//! Field schema for agent frontmatter.

use super::fuzzy::fuzzy_match;
use super::ValidationOptions;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use crate::document::{ConfigNode, ConfigTree, NodeValue};

pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_MODEL: &str = "model";
pub const FIELD_TOOLS: &str = "tools";
pub const FIELD_MCP_SERVERS: &str = "mcp_servers";
pub const FIELD_TEMPERATURE: &str = "temperature";
pub const FIELD_MAX_TOKENS: &str = "max_tokens";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_METADATA: &str = "metadata";

/// Expected runtime shape of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    String,
    Number,
    /// Integer greater than or equal to zero.
    Count,
    StringList,
    /// List of server names or mappings carrying a string `name`.
    ServerList,
    Mapping,
}

impl FieldShape {
    pub fn describe(self) -> &'static str {
        match self {
            FieldShape::String => "string",
            FieldShape::Number => "number",
            FieldShape::Count => "non-negative integer",
            FieldShape::StringList => "list of strings",
            FieldShape::ServerList => "list of server names or `name:` entries",
            FieldShape::Mapping => "mapping",
        }
    }

    fn is_list(self) -> bool {
        matches!(self, FieldShape::StringList | FieldShape::ServerList)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub shape: FieldShape,
    /// Literal YAML showing a correct value.
    pub example: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub version: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn v1() -> Self {
        let field = |name: &'static str, required: bool, shape: FieldShape, example: &'static str| FieldSpec {
            name,
            required,
            shape,
            example,
        };
        Self {
            version: "1",
            fields: vec![
                field(FIELD_NAME, true, FieldShape::String, "name: research-assistant"),
                field(
                    FIELD_DESCRIPTION,
                    true,
                    FieldShape::String,
                    "description: Answers questions using web search",
                ),
                field(FIELD_MODEL, false, FieldShape::String, "model: openai/gpt-4o"),
                field(
                    FIELD_TOOLS,
                    false,
                    FieldShape::StringList,
                    "tools:\n  - web_search\n  - file_reader",
                ),
                field(
                    FIELD_MCP_SERVERS,
                    false,
                    FieldShape::ServerList,
                    "mcp_servers:\n  - filesystem\n  - name: github\n    args: [--read-only]",
                ),
                field(FIELD_TEMPERATURE, false, FieldShape::Number, "temperature: 0.7"),
                field(FIELD_MAX_TOKENS, false, FieldShape::Count, "max_tokens: 4096"),
                field(FIELD_TAGS, false, FieldShape::StringList, "tags:\n  - research"),
                field(
                    FIELD_METADATA,
                    false,
                    FieldShape::Mapping,
                    "metadata:\n  owner: docs-team",
                ),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::v1()
    }
}

/// Check the tree against the schema, collecting every finding.
pub fn check_schema(tree: &ConfigTree, schema: &Schema, options: &ValidationOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let header = tree.span();

    for spec in schema.fields.iter().filter(|f| f.required) {
        if tree.get(spec.name).is_none() {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MissingRequiredField,
                    Location::line(header.start_line),
                    format!(
                        "Required field `{}` ({}) is missing from the frontmatter.",
                        spec.name,
                        spec.shape.describe()
                    ),
                )
                .with_suggestions([format!("Add it to the header:\n{}", spec.example)]),
            );
        }
    }

    for entry in tree.entries() {
        match entry.key_str().and_then(|key| schema.field(key)) {
            Some(spec) => {
                if let Some(diagnostic) = check_shape(spec, &entry.node) {
                    diagnostics.push(diagnostic);
                }
            }
            None => diagnostics.push(unknown_field(&entry.name, &entry.node, schema, options)),
        }
    }

    diagnostics
}

fn unknown_field(key: &str, node: &ConfigNode, schema: &Schema, options: &ValidationOptions) -> Diagnostic {
    let best = fuzzy_match(key, schema.field_names(), options.max_distance, 1);
    let message = match best.first() {
        Some(candidate) => format!(
            "Unknown field `{}` is not part of the agent schema (version {}). Did you mean `{}`?",
            key, schema.version, candidate
        ),
        None => format!(
            "Unknown field `{}` is not part of the agent schema (version {}) and will be ignored. Known fields: {}.",
            key,
            schema.version,
            schema.field_names().collect::<Vec<_>>().join(", ")
        ),
    };
    Diagnostic::new(
        DiagnosticKind::UnknownField,
        Location::spanning(node.span.start_line, node.span.end_line),
        message,
    )
    .with_suggestions(best)
}

fn check_shape(spec: &FieldSpec, node: &ConfigNode) -> Option<Diagnostic> {
    match (spec.shape, &node.value) {
        (FieldShape::String, NodeValue::String(_)) => None,
        (FieldShape::Number, NodeValue::Number(_)) => None,
        (FieldShape::Count, NodeValue::Number(n)) if n.is_u64() => None,
        (FieldShape::Mapping, NodeValue::Mapping(_)) => None,
        (FieldShape::StringList, NodeValue::Sequence(items)) => items
            .iter()
            .enumerate()
            .find(|(_, item)| item.as_str().is_none())
            .map(|(index, item)| wrong_item(spec, index, item, "a string")),
        (FieldShape::ServerList, NodeValue::Sequence(items)) => items
            .iter()
            .enumerate()
            .find(|(_, item)| !is_server_entry(item))
            .map(|(index, item)| {
                wrong_item(spec, index, item, "a server name or a mapping with a string `name`")
            }),
        _ => Some(wrong_type(spec, node)),
    }
}

fn is_server_entry(item: &ConfigNode) -> bool {
    match &item.value {
        NodeValue::String(_) => true,
        NodeValue::Mapping(_) => item.get("name").and_then(ConfigNode::as_str).is_some(),
        _ => false,
    }
}

fn wrong_type(spec: &FieldSpec, node: &ConfigNode) -> Diagnostic {
    let actual = match (&node.value, spec.shape) {
        (NodeValue::Number(_), FieldShape::Count) => "negative or fractional number",
        _ => node.shape_name(),
    };
    let mut message = format!(
        "Field `{}` must be a {}, but got a {}.",
        spec.name,
        spec.shape.describe(),
        actual
    );
    let mut suggestions = Vec::new();

    if spec.shape.is_list() {
        if let Some(single) = scalar_text(node) {
            message.push_str(" Even a single item must be written as a list.");
            suggestions.push(format!("{}:\n  - {}", spec.name, single));
            suggestions.push(format!("{}: [{}]", spec.name, single));
        }
    }
    if matches!(node.value, NodeValue::Null) {
        message.push_str(" The key is present but has no value; remove it or give it one.");
    }
    suggestions.push(spec.example.to_string());

    Diagnostic::new(
        DiagnosticKind::WrongFieldType,
        Location::spanning(node.span.start_line, node.span.end_line),
        message,
    )
    .with_suggestions(suggestions)
}

fn wrong_item(spec: &FieldSpec, index: usize, item: &ConfigNode, expected: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::WrongFieldType,
        Location::spanning(item.span.start_line, item.span.end_line),
        format!(
            "Field `{}` must be a {}, but item {} is a {} instead of {}.",
            spec.name,
            spec.shape.describe(),
            index + 1,
            item.shape_name(),
            expected
        ),
    )
    .with_suggestions([spec.example])
}

fn scalar_text(node: &ConfigNode) -> Option<String> {
    match &node.value {
        NodeValue::String(s) => Some(s.clone()),
        NodeValue::Number(n) => Some(n.to_string()),
        NodeValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

//! Coercion of a validated header tree into [`ValidatedConfig`].
//!
//! Runs only after the schema stage found nothing blocking, so a failure here
//! means the schema and the typed record disagree.

use super::config::{ServerRef, ValidatedConfig};
use crate::document::tree::entries_to_mapping;
use crate::document::{ConfigNode, ConfigTree, NodeValue};
use crate::error::CheckError;
use crate::validation::schema::{
    Schema, FIELD_DESCRIPTION, FIELD_MAX_TOKENS, FIELD_MCP_SERVERS, FIELD_METADATA, FIELD_MODEL,
    FIELD_NAME, FIELD_TAGS, FIELD_TEMPERATURE, FIELD_TOOLS,
};
use serde_yaml::{Mapping, Number, Value};

fn invariant(field: &str, expected: &str, node: &ConfigNode) -> CheckError {
    CheckError::InvariantViolation(format!(
        "field `{}` passed validation but is a {} instead of a {}",
        field,
        node.shape_name(),
        expected
    ))
}

fn string_field(field: &str, node: &ConfigNode) -> Result<String, CheckError> {
    node.as_str()
        .map(str::to_string)
        .ok_or_else(|| invariant(field, "string", node))
}

fn string_list(field: &str, node: &ConfigNode) -> Result<Vec<String>, CheckError> {
    let items = node
        .as_sequence()
        .ok_or_else(|| invariant(field, "list", node))?;
    items.iter().map(|item| string_field(field, item)).collect()
}

fn server_list(node: &ConfigNode) -> Result<Vec<ServerRef>, CheckError> {
    let items = node
        .as_sequence()
        .ok_or_else(|| invariant(FIELD_MCP_SERVERS, "list", node))?;
    items
        .iter()
        .map(|item| match &item.value {
            NodeValue::String(name) => Ok(ServerRef::Name(name.clone())),
            NodeValue::Mapping(entries) => {
                let name = item
                    .get("name")
                    .and_then(ConfigNode::as_str)
                    .ok_or_else(|| invariant(FIELD_MCP_SERVERS, "named entry", item))?
                    .to_string();
                let options =
                    entries_to_mapping(entries.iter().filter(|entry| entry.key_str() != Some("name")));
                Ok(ServerRef::Detailed { name, options })
            }
            _ => Err(invariant(FIELD_MCP_SERVERS, "server entry", item)),
        })
        .collect()
}

fn number_field(field: &str, node: &ConfigNode) -> Result<Number, CheckError> {
    match &node.value {
        NodeValue::Number(n) => Ok(n.clone()),
        _ => Err(invariant(field, "number", node)),
    }
}

fn count_field(field: &str, node: &ConfigNode) -> Result<u64, CheckError> {
    match &node.value {
        NodeValue::Number(n) => n
            .as_u64()
            .ok_or_else(|| invariant(field, "non-negative integer", node)),
        _ => Err(invariant(field, "non-negative integer", node)),
    }
}

fn mapping_field(field: &str, node: &ConfigNode) -> Result<Mapping, CheckError> {
    match node.to_yaml() {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(invariant(field, "mapping", node)),
    }
}

fn required<'a>(tree: &'a ConfigTree, field: &str) -> Result<&'a ConfigNode, CheckError> {
    tree.get(field).ok_or_else(|| {
        CheckError::InvariantViolation(format!(
            "required field `{}` is absent after validation passed",
            field
        ))
    })
}

/// Build the typed config from a tree that passed the schema stage.
pub fn coerce_validated_config(
    tree: &ConfigTree,
    schema: &Schema,
) -> Result<ValidatedConfig, CheckError> {
    let mut config = ValidatedConfig::named(
        string_field(FIELD_NAME, required(tree, FIELD_NAME)?)?,
        string_field(FIELD_DESCRIPTION, required(tree, FIELD_DESCRIPTION)?)?,
    );

    for entry in tree.entries() {
        let node = &entry.node;
        let Some(key) = entry.key_str() else {
            config.extra.insert(entry.key.clone(), node.to_yaml());
            continue;
        };
        match key {
            FIELD_NAME | FIELD_DESCRIPTION => {}
            FIELD_MODEL => config.model = Some(string_field(key, node)?),
            FIELD_TOOLS => config.tools = Some(string_list(key, node)?),
            FIELD_MCP_SERVERS => config.mcp_servers = Some(server_list(node)?),
            FIELD_TEMPERATURE => config.temperature = Some(number_field(key, node)?),
            FIELD_MAX_TOKENS => config.max_tokens = Some(count_field(key, node)?),
            FIELD_TAGS => config.tags = Some(string_list(key, node)?),
            FIELD_METADATA => config.metadata = Some(mapping_field(key, node)?),
            other if schema.field(other).is_some() => {
                return Err(CheckError::InvariantViolation(format!(
                    "schema field `{}` has no typed counterpart",
                    other
                )));
            }
            _ => {
                config.extra.insert(entry.key.clone(), node.to_yaml());
            }
        }
    }

    Ok(config)
}

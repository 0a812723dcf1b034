//! Cross-reference checks against caller-supplied registries.

use super::fuzzy::fuzzy_match;
use super::schema::{FIELD_MCP_SERVERS, FIELD_MODEL, FIELD_TOOLS};
use super::ValidationOptions;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use crate::document::{ConfigNode, ConfigTree, NodeValue};
use crate::registry::{split_model_id, ModelRules, Registry, MODEL_PREFIX_SEPARATOR};
use std::collections::BTreeSet;

/// Resolve capability, sub-server, and model references. Only values with the
/// right shape are checked; shape problems belong to the schema stage.
pub fn resolve_references(
    tree: &ConfigTree,
    registry: &Registry,
    options: &ValidationOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let Some(tools) = tree.get(FIELD_TOOLS).and_then(ConfigNode::as_sequence) {
        for item in tools {
            let Some(name) = item.as_str() else { continue };
            if !registry.known_capabilities.contains(name) {
                diagnostics.push(unknown_capability(name, item, registry, options));
            }
        }
    }

    if let Some(servers) = tree.get(FIELD_MCP_SERVERS).and_then(ConfigNode::as_sequence) {
        for entry in servers {
            let Some((name, node)) = server_name(entry) else { continue };
            if !registry.known_subservers.contains(name) {
                diagnostics.push(unknown_subserver(name, node, registry, options));
            }
        }
    }

    if let Some(model_node) = tree.get(FIELD_MODEL) {
        if let Some(model) = model_node.as_str() {
            if let Some(diagnostic) =
                check_model(model, model_node, &registry.model_rules, options)
            {
                diagnostics.push(diagnostic);
            }
        }
    }

    diagnostics
}

/// Effective name of a server entry: a bare string, or the `name` of a mapping.
fn server_name(entry: &ConfigNode) -> Option<(&str, &ConfigNode)> {
    match &entry.value {
        NodeValue::String(name) => Some((name.as_str(), entry)),
        NodeValue::Mapping(_) => {
            let node = entry.get("name")?;
            node.as_str().map(|name| (name, node))
        }
        _ => None,
    }
}

fn location_of(node: &ConfigNode) -> Location {
    Location::spanning(node.span.start_line, node.span.end_line)
}

fn unknown_capability(
    name: &str,
    node: &ConfigNode,
    registry: &Registry,
    options: &ValidationOptions,
) -> Diagnostic {
    let suggestions = fuzzy_match(
        name,
        registry.known_capabilities.iter().map(String::as_str),
        options.max_distance,
        options.max_results,
    );
    let message = with_hint(
        format!(
            "Tool `{}` in `{}` is not an available capability.",
            name, FIELD_TOOLS
        ),
        &suggestions,
        registry.known_capabilities.iter().map(String::as_str),
    );
    Diagnostic::new(DiagnosticKind::UnknownCapability, location_of(node), message)
        .with_suggestions(suggestions)
}

fn unknown_subserver(
    name: &str,
    node: &ConfigNode,
    registry: &Registry,
    options: &ValidationOptions,
) -> Diagnostic {
    let suggestions = fuzzy_match(
        name,
        registry.known_subservers.iter().map(String::as_str),
        options.max_distance,
        options.max_results,
    );
    let message = with_hint(
        format!(
            "Server `{}` in `{}` is not a configured MCP server.",
            name, FIELD_MCP_SERVERS
        ),
        &suggestions,
        registry.known_subservers.iter().map(String::as_str),
    );
    Diagnostic::new(DiagnosticKind::UnknownSubserver, location_of(node), message)
        .with_suggestions(suggestions)
}

/// Append "did you mean" or, failing that, a short list of what is available.
fn with_hint<'a, I>(mut message: String, suggestions: &[String], available: I) -> String
where
    I: Iterator<Item = &'a str>,
{
    if let Some(best) = suggestions.first() {
        message.push_str(&format!(" Did you mean `{}`?", best));
        return message;
    }
    let available: Vec<&str> = available.take(10).collect();
    if available.is_empty() {
        message.push_str(" No names of this kind are registered.");
    } else {
        message.push_str(&format!(" Available: {}.", available.join(", ")));
    }
    message
}

fn check_model(
    model: &str,
    node: &ConfigNode,
    rules: &ModelRules,
    options: &ValidationOptions,
) -> Option<Diagnostic> {
    if rules.known_models.contains(model) {
        return None;
    }

    let Some((prefix, name)) = split_model_id(model) else {
        return Some(missing_prefix(model, node, rules, options));
    };

    if rules.known_prefixes.contains(prefix) {
        let suggestions = fuzzy_match(
            model,
            rules.models_under(prefix),
            options.max_distance,
            options.max_results,
        );
        let mut message = format!(
            "Model `{}` is not in the known catalog for provider `{}`. It may be new or misspelled.",
            model, prefix
        );
        if let Some(best) = suggestions.first() {
            message.push_str(&format!(" Did you mean `{}`?", best));
        }
        return Some(
            Diagnostic::new(DiagnosticKind::UnknownModelForPrefix, location_of(node), message)
                .with_severity(options.model_drift_severity)
                .with_suggestions(suggestions),
        );
    }

    let suggestions: Vec<String> = fuzzy_match(
        prefix,
        rules.known_prefixes.iter().map(String::as_str),
        options.max_distance,
        options.max_results,
    )
    .into_iter()
    .map(|p| format!("{}{}{}", p, MODEL_PREFIX_SEPARATOR, name))
    .collect();
    let mut message = format!(
        "Model provider prefix `{}` in `{}` is not recognized.",
        prefix, model
    );
    if let Some(best) = suggestions.first() {
        message.push_str(&format!(" Did you mean `{}`?", best));
    } else if !rules.known_prefixes.is_empty() {
        message.push_str(&format!(
            " Known providers: {}.",
            rules
                .known_prefixes
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    Some(
        Diagnostic::new(DiagnosticKind::UnknownModelPrefix, location_of(node), message)
            .with_suggestions(suggestions),
    )
}

fn missing_prefix(
    model: &str,
    node: &ConfigNode,
    rules: &ModelRules,
    options: &ValidationOptions,
) -> Diagnostic {
    let mut suggestions: Vec<String> = rules
        .known_prefixes
        .iter()
        .map(|p| format!("{}{}{}", p, MODEL_PREFIX_SEPARATOR, model))
        .filter(|candidate| rules.known_models.contains(candidate))
        .collect();

    if suggestions.is_empty() {
        // Closest bare names, expanded back to full identifiers.
        let bare: BTreeSet<&str> = rules
            .known_models
            .iter()
            .filter_map(|m| split_model_id(m).map(|(_, n)| n))
            .collect();
        for close in fuzzy_match(model, bare, options.max_distance, options.max_results) {
            suggestions.extend(
                rules
                    .known_models
                    .iter()
                    .filter(|m| split_model_id(m).map(|(_, n)| n == close).unwrap_or(false))
                    .cloned(),
            );
        }
        suggestions.truncate(options.max_results);
    }

    if suggestions.is_empty() {
        suggestions.extend(
            rules
                .known_prefixes
                .iter()
                .take(options.max_results)
                .map(|p| format!("{}{}{}", p, MODEL_PREFIX_SEPARATOR, model)),
        );
    }

    let example = rules
        .known_prefixes
        .iter()
        .next()
        .map(String::as_str)
        .unwrap_or("provider");
    Diagnostic::new(
        DiagnosticKind::MissingModelPrefix,
        location_of(node),
        format!(
            "Model `{}` has no provider prefix. Model identifiers are written as `provider{}model`, e.g. `model: {}{}{}`.",
            model, MODEL_PREFIX_SEPARATOR, example, MODEL_PREFIX_SEPARATOR, model
        ),
    )
    .with_suggestions(suggestions)
}

//! Registries
//!
//! Read-only snapshots of externally known names. Callers populate them and
//! pass them into every validation call; nothing here is cached or global.

use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// Separator between a model's provider prefix and its name.
pub const MODEL_PREFIX_SEPARATOR: char = '/';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRules {
    #[serde(default, rename = "known")]
    pub known_models: BTreeSet<String>,
    #[serde(default, rename = "prefixes")]
    pub known_prefixes: BTreeSet<String>,
}

impl ModelRules {
    pub fn new<M, P>(models: M, prefixes: P) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            known_models: models.into_iter().map(Into::into).collect(),
            known_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Known models whose prefix is `prefix`.
    pub fn models_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.known_models
            .iter()
            .filter(move |m| split_model_id(m).map(|(p, _)| p == prefix).unwrap_or(false))
            .map(String::as_str)
    }

    /// Fill `known_prefixes` from the known models when none were given.
    fn derive_prefixes_if_empty(&mut self) {
        if self.known_prefixes.is_empty() {
            self.known_prefixes = self
                .known_models
                .iter()
                .filter_map(|m| split_model_id(m).map(|(p, _)| p.to_string()))
                .collect();
        }
    }
}

/// Split `prefix/name` at the first separator.
pub fn split_model_id(model: &str) -> Option<(&str, &str)> {
    model.split_once(MODEL_PREFIX_SEPARATOR)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default, rename = "capabilities")]
    pub known_capabilities: BTreeSet<String>,
    #[serde(default, rename = "subservers")]
    pub known_subservers: BTreeSet<String>,
    #[serde(default, rename = "models")]
    pub model_rules: ModelRules,
}

impl Registry {
    pub fn new<C, S>(capabilities: C, subservers: S, model_rules: ModelRules) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            known_capabilities: capabilities.into_iter().map(Into::into).collect(),
            known_subservers: subservers.into_iter().map(Into::into).collect(),
            model_rules,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CheckError> {
        let mut registry: Registry = toml::from_str(text)
            .map_err(|e| CheckError::RegistryError(format!("Invalid registry snapshot: {}", e)))?;
        registry.model_rules.derive_prefixes_if_empty();
        Ok(registry)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CheckError> {
        let mut registry: Registry = serde_yaml::from_str(text)
            .map_err(|e| CheckError::RegistryError(format!("Invalid registry snapshot: {}", e)))?;
        registry.model_rules.derive_prefixes_if_empty();
        Ok(registry)
    }

    /// Load a snapshot file; `.yaml`/`.yml` are read as YAML, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let text = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }
}

/// Identifiers of reusable text fragments available for inclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentRegistry {
    fragments: BTreeSet<String>,
}

impl FragmentRegistry {
    pub fn new<I>(fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Enumerate fragment files under `dir`; each identifier is the relative
    /// path without extension, `/`-separated.
    pub fn from_dir(dir: &Path) -> Result<Self, CheckError> {
        let mut fragments = BTreeSet::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| {
                CheckError::RegistryError(format!(
                    "Failed to enumerate fragments in {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let parts: Vec<String> = relative
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            fragments.insert(parts.join("/"));
        }
        Ok(Self { fragments })
    }
}

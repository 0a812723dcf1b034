//! Typed agent configuration owned by the agent domain.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Number};

/// MCP server reference: a bare name, or a name with launch options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerRef {
    Name(String),
    Detailed {
        name: String,
        /// Remaining keys of the entry (`args`, `env`, ...) in document order.
        #[serde(flatten)]
        options: Mapping,
    },
}

impl ServerRef {
    pub fn name(&self) -> &str {
        match self {
            ServerRef::Name(name) => name,
            ServerRef::Detailed { name, .. } => name,
        }
    }
}

/// Agent configuration coerced from a frontmatter header that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedConfig {
    pub name: String,

    pub description: String,

    /// Provider-prefixed model identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_servers: Option<Vec<ServerRef>>,

    /// Kept as decoded: `1` stays an integer, `0.7` a float.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Mapping>,

    /// Keys outside the schema, kept verbatim in document order.
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub extra: Mapping,
}

impl ValidatedConfig {
    /// Minimal config with only the required fields set.
    pub fn named(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: None,
            tools: None,
            mcp_servers: None,
            temperature: None,
            max_tokens: None,
            tags: None,
            metadata: None,
            extra: Mapping::new(),
        }
    }

    pub fn tool_names(&self) -> &[String] {
        self.tools.as_deref().unwrap_or(&[])
    }

    pub fn temperature_f64(&self) -> Option<f64> {
        self.temperature.as_ref().and_then(Number::as_f64)
    }

    pub fn server_names(&self) -> Vec<&str> {
        self.mcp_servers
            .iter()
            .flatten()
            .map(ServerRef::name)
            .collect()
    }
}

use agentcheck::{FragmentRegistry, ModelRules, RawDocument, Registry};
use std::fs;
use std::path::{Path, PathBuf};

pub const REGISTRY_TOML: &str = r#"
capabilities = ["web_search", "file_reader", "code_exec"]
subservers = ["filesystem", "github"]

[models]
known = ["openai/gpt-4o", "openai/gpt-4o-mini", "anthropic/claude-sonnet"]
"#;

pub const VALID_AGENT: &str = "---\n\
name: research-assistant\n\
description: Answers questions using web search\n\
model: openai/gpt-4o\n\
tools:\n  - web_search\n  - file_reader\n\
mcp_servers:\n  - filesystem\n  - name: github\n    args: [--read-only]\n\
temperature: 0.2\n\
max_tokens: 2048\n\
tags: [research]\n\
---\n\
You are a research assistant.\n\
\n\
{% include \"shared/tone\" %}\n";

pub fn registry() -> Registry {
    Registry::new(
        ["web_search", "file_reader", "code_exec"],
        ["filesystem", "github"],
        ModelRules::new(
            ["openai/gpt-4o", "openai/gpt-4o-mini", "anthropic/claude-sonnet"],
            ["openai", "anthropic"],
        ),
    )
}

pub fn fragments() -> FragmentRegistry {
    FragmentRegistry::new(["shared/tone", "shared/safety"])
}

pub fn doc(text: &str) -> RawDocument {
    RawDocument::new("agents/test.md", text)
}

pub fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

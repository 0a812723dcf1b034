//! Agent Documents
//!
//! Raw agent files, the frontmatter split, and the decoded header tree.

pub mod decoder;
pub mod frontmatter;
mod spans;
pub mod tree;

pub use decoder::decode_header;
pub use frontmatter::{split_frontmatter, Frontmatter, FRONTMATTER_DELIMITER};
pub use tree::{ConfigNode, ConfigTree, MappingEntry, NodeValue, SourceSpan};

use crate::error::CheckError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension recognized when loading a directory of agent documents.
pub const AGENT_FILE_EXTENSION: &str = "md";

/// Immutable document input as read from disk (or supplied by a caller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub path: PathBuf,
    pub text: String,
}

impl RawDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, CheckError> {
        let text = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        Ok(Self::new(path, text))
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load one document, or every `*.md` document under a directory sorted by path.
pub fn load_documents(path: &Path) -> Result<Vec<RawDocument>, CheckError> {
    if path.is_file() {
        return Ok(vec![RawDocument::read(path)?]);
    }
    if !path.is_dir() {
        return Err(CheckError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        ));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|e| {
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            CheckError::io(path, io)
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(AGENT_FILE_EXTENSION)
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    paths.iter().map(|p| RawDocument::read(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_documents_walks_markdown_files_in_order() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("b.md"), "b").unwrap();
        fs::write(temp.path().join("nested/a.md"), "a").unwrap();
        fs::write(temp.path().join("notes.txt"), "skip").unwrap();

        let docs = load_documents(temp.path()).unwrap();
        let names: Vec<String> = docs
            .iter()
            .map(|d| {
                d.path
                    .strip_prefix(temp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["b.md".to_string(), "nested/a.md".to_string()]);
    }

    #[test]
    fn load_documents_reads_a_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("agent.md");
        fs::write(&file, "---\nname: a\n---\n").unwrap();

        let docs = load_documents(&file).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.starts_with("---"));
    }

    #[test]
    fn load_documents_reports_missing_path() {
        let temp = TempDir::new().unwrap();
        let err = load_documents(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }
}

//! CLI Tooling
//!
//! Command-line surface over the validation pipeline. Parsing lives in
//! [`Cli`]; [`CliContext`] owns the loaded configuration and turns a command
//! into printable output plus an overall pass/fail verdict.

use crate::config::{CheckerConfig, ConfigLoader};
use crate::document::{load_documents, RawDocument};
use crate::error::CheckError;
use crate::format::{format_reports, format_schema, format_summary_text, FormatMode};
use crate::logging::LoggingConfig;
use crate::pipeline::DocumentValidator;
use crate::registry::{FragmentRegistry, Registry};
use crate::validation::Schema;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// agentcheck - validate agent definition frontmatter
#[derive(Parser)]
#[command(name = "agentcheck")]
#[command(about = "Validate agent definition files and explain every problem found")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides agentcheck.toml lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply the `--log-*` flags on top of the configured logging section.
    pub fn logging_overrides(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut logging = base.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate agent documents (files, or directories of *.md files)
    Check {
        /// Documents or directories to validate
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Registry snapshot (TOML or YAML) with capabilities, subservers, and models
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Directory of include fragments
        #[arg(long)]
        fragments: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Worker threads (defaults to the `workers` config value)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Print the agent schema
    Schema {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Printable result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    /// False when any checked document failed.
    pub passed: bool,
}

/// CLI execution context
pub struct CliContext {
    config: CheckerConfig,
    /// Style text headings with ANSI escapes.
    color: bool,
}

impl CliContext {
    /// Load configuration from `config_path`, or from `agentcheck.toml` in the current directory.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, CheckError> {
        let working_dir = std::env::current_dir().map_err(|e| CheckError::io(".", e))?;
        let config = ConfigLoader::resolve(config_path.as_deref(), &working_dir)?;
        // Styled only when stdout is a terminal and the config allows it.
        let color = config.logging.color && std::io::stdout().is_terminal();
        Ok(Self { config, color })
    }

    /// Context for embedding callers; headings stay plain unless [`Self::with_color`] is used.
    pub fn with_config(config: CheckerConfig) -> Self {
        Self {
            config,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, CheckError> {
        match command {
            Commands::Check {
                paths,
                registry,
                fragments,
                format,
                workers,
            } => self.handle_check(
                paths,
                registry.as_deref(),
                fragments.as_deref(),
                FormatMode::parse(format)?,
                workers.unwrap_or(self.config.workers),
            ),
            Commands::Schema { format } => Ok(CommandOutput {
                text: format_schema(&Schema::v1(), FormatMode::parse(format)?, self.color)?,
                passed: true,
            }),
        }
    }

    fn handle_check(
        &self,
        paths: &[PathBuf],
        registry_path: Option<&Path>,
        fragments_dir: Option<&Path>,
        mode: FormatMode,
        workers: usize,
    ) -> Result<CommandOutput, CheckError> {
        let started = Instant::now();
        let options = self.config.to_options()?;

        let registry = match registry_path {
            Some(path) => Registry::load(path)?,
            None => Registry::default(),
        };
        let fragments = match fragments_dir {
            Some(dir) => FragmentRegistry::from_dir(dir)?,
            None => FragmentRegistry::default(),
        };
        debug!(
            capabilities = registry.known_capabilities.len(),
            subservers = registry.known_subservers.len(),
            fragments = fragments.len(),
            "Loaded registries"
        );

        let mut documents: Vec<RawDocument> = Vec::new();
        for path in paths {
            documents.extend(load_documents(path)?);
        }

        let validator = DocumentValidator::new(Schema::v1(), options);
        let reports = validator.validate_all(&documents, &registry, &fragments, workers)?;
        let passed = reports.iter().all(|r| r.passed());

        let mut text = format_reports(&reports, mode)?;
        if mode == FormatMode::Readable && !reports.is_empty() {
            text.push('\n');
            text.push_str(&format_summary_text(&reports, self.color));
        }

        info!(
            documents = reports.len(),
            passed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Check complete"
        );
        Ok(CommandOutput { text, passed })
    }
}

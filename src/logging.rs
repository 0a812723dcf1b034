//! Logging System
//!
//! Structured logging on `tracing`. Level, format, and destination come from
//! [`LoggingConfig`], with `AGENTCHECK_LOG*` environment variables taking
//! precedence over the config file.

use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "AGENTCHECK_LOG";
const ENV_MODULES: &str = "AGENTCHECK_LOG_MODULES";
const ENV_FORMAT: &str = "AGENTCHECK_LOG_FORMAT";
const ENV_OUTPUT: &str = "AGENTCHECK_LOG_OUTPUT";
const ENV_FILE: &str = "AGENTCHECK_LOG_FILE";

/// Resolve the log file path with precedence: CLI, AGENTCHECK_LOG_FILE env, config file, default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, CheckError> {
    let env_file = std::env::var(ENV_FILE).ok().map(PathBuf::from);
    let explicit = [cli_file, env_file, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty());
    match explicit {
        Some(path) => Ok(path),
        None => default_log_file_path(),
    }
}

fn default_log_file_path() -> Result<PathBuf, CheckError> {
    let project_dirs = directories::ProjectDirs::from("", "agentcheck", "agentcheck")
        .ok_or_else(|| {
            CheckError::ConfigError(
                "Could not determine platform state directory for log file".to_string(),
            )
        })?;
    // Not every platform has a state dir; fall back to the data dir.
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(dir.join("agentcheck.log"))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means use runtime default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

// Reports go to stdout, so logs default to stderr.
fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (AGENTCHECK_LOG, AGENTCHECK_LOG_FORMAT, ...)
/// 2. Configuration (file values with CLI overrides already applied)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), CheckError> {
    let default_config = LoggingConfig::default();
    let config = config.unwrap_or(&default_config);

    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| CheckError::ConfigError(format!("Failed to install logger: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let json = determine_format(config)? == "json";
    let output = determine_output(config)?;
    let writer = output.make_writer(config)?;
    let ansi = config.color && !output.file;

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let base_subscriber = Registry::default().with(filter);
    let installed = if json {
        base_subscriber.with(layer.json()).try_init()
    } else {
        base_subscriber.with(layer.with_ansi(ansi)).try_init()
    };
    installed.map_err(|e| CheckError::ConfigError(format!("Failed to install logger: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, CheckError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut directives: Vec<String> = config
        .modules
        .iter()
        .map(|(module, level)| format!("{}={}", module, level))
        .collect();
    // Map iteration order is arbitrary; keep the directive list stable.
    directives.sort();

    if let Ok(modules) = std::env::var(ENV_MODULES) {
        directives.extend(modules.split(',').filter_map(|spec| {
            let (module, level) = spec.split_once('=')?;
            Some(format!("{}={}", module.trim(), level.trim()))
        }));
    }

    let mut filter = EnvFilter::new(&config.level);
    for directive in directives {
        filter = filter.add_directive(directive.parse().map_err(|e| {
            CheckError::ConfigError(format!("Invalid log directive {}: {}", directive, e))
        })?);
    }
    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<String, CheckError> {
    if let Ok(format) = std::env::var(ENV_FORMAT) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    match config.format.as_str() {
        "json" | "text" => Ok(config.format.clone()),
        other => Err(CheckError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Output destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

impl OutputDestinations {
    fn make_writer(&self, config: &LoggingConfig) -> Result<BoxMakeWriter, CheckError> {
        if self.file {
            let file = Arc::new(open_log_file(config)?);
            return Ok(if self.stderr {
                BoxMakeWriter::new(file.and(std::io::stderr))
            } else {
                BoxMakeWriter::new(file)
            });
        }
        Ok(match (self.stdout, self.stderr) {
            (true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            (true, false) => BoxMakeWriter::new(std::io::stdout),
            _ => BoxMakeWriter::new(std::io::stderr),
        })
    }
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, CheckError> {
    let log_file = resolve_log_file_path(None, config.file.clone())?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CheckError::io(parent, e))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| CheckError::io(&log_file, e))
}

/// Determine output destinations from config or environment
fn determine_output(config: &LoggingConfig) -> Result<OutputDestinations, CheckError> {
    match std::env::var(ENV_OUTPUT) {
        Ok(output) => parse_output_destinations(&output),
        Err(_) => parse_output_destinations(&config.output),
    }
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, CheckError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        _ => {
            return Err(CheckError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}

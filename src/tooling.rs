//! Tooling & Integration Layer
//!
//! The command-line surface over the pipeline.

pub mod cli;

pub use cli::{Cli, CliContext, CommandOutput, Commands};

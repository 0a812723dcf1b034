mod cli_contracts;
mod format_contracts;
mod pipeline_contracts;
pub mod support;

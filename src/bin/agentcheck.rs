//! agentcheck CLI Binary
//!
//! Exit codes: 0 when every document passed, 1 when any failed, 2 on an
//! operational error.

use agentcheck::logging::init_logging;
use agentcheck::tooling::cli::{Cli, CliContext};
use anyhow::Context;
use clap::Parser;
use std::process;

const EXIT_FAILED: i32 = 1;
const EXIT_OPERATIONAL: i32 = 2;

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_FAILED),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_OPERATIONAL);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let context = CliContext::new(cli.config.clone()).context("Failed to load configuration")?;

    let logging = cli.logging_overrides(&context.config().logging);
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    let output = context.execute(&cli.command)?;
    println!("{}", output.text);
    Ok(output.passed)
}

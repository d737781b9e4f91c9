//! TSGate CLI
//!
//! Lints a TypeScript input tree and emits one generated test per file.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{build::run_build, init::run_init, rules::run_rules};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(build_failed) => {
            if build_failed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(true)` when a build failed on lint errors.
fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Build(args) => run_build(cli.config.as_deref(), args),
        Commands::Init { force } => run_init(cli.config.as_deref(), *force).map(|_| false),
        Commands::Rules => run_rules().map(|_| false),
    }
}

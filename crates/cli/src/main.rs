//! # Lever Watcher CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Layered configuration (file, flags, environment)
//! - The fetch → detect → dispatch pipeline
//! - History maintenance commands

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_history, run_list, run_validate, run_watch};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig::from_verbosity(
        cli.log_format.into(),
        cli.verbose,
        cli.quiet,
    ))?;

    debug!(version = env!("CARGO_PKG_VERSION"), "Lever Watcher starting");

    let result = match &cli.command {
        Commands::Watch(args) => run_watch(args).await,
        Commands::List(args) => run_list(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::History(args) => run_history(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

//! CLI entrypoint for bluffcheck
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use bluff_application::{NoSessionLogger, SessionLogger};
use bluff_infrastructure::{ConfigLoader, JsonlSessionLogger};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod demo;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting bluffcheck");

    let config = ConfigLoader::load(cli.config.as_deref())?;
    let params = config.capture_params()?;
    let scoring = config.scoring_params();

    // Session log sink: JSONL file when requested, no-op otherwise
    let logger: Box<dyn SessionLogger> = match &cli.log {
        Some(path) => match JsonlSessionLogger::new(path) {
            Some(logger) => {
                info!("Writing session log to {}", logger.path().display());
                Box::new(logger)
            }
            None => {
                eprintln!("warning: could not open session log at {}", path.display());
                Box::new(NoSessionLogger)
            }
        },
        None => Box::new(NoSessionLogger),
    };

    match &cli.command {
        Command::Demo(args) => demo::run(args, params, scoring, logger.as_ref()).await?,
    }

    Ok(())
}

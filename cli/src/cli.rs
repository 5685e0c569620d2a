//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// bluffcheck - party lie-detector game core
#[derive(Parser, Debug)]
#[command(name = "bluffcheck", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML config file (capture timing, scoring thresholds)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write a JSONL session log to this path
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a scripted calibration and game session with synthetic players
    Demo(DemoArgs),
}

#[derive(clap::Args, Debug)]
pub struct DemoArgs {
    /// Number of gameplay questions per session
    #[arg(long, default_value_t = 5)]
    pub questions: usize,

    /// Output format for the session results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored per-question verdicts plus the session summary
    Text,
    /// One JSON document with verdicts and summary
    Json,
}

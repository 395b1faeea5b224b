//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Garment agent - virtual try-on and recommendation orchestrator
#[derive(Parser)]
#[command(
    name = "ga",
    about = "Agentic orchestrator for garment try-on and recommendation",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process one request and print the final result as JSON
    Request {
        /// Request text (e.g. "빨간색 원피스 추천해줘")
        #[arg(short, long)]
        text: Option<String>,

        /// Path to an uploaded garment image
        #[arg(short, long)]
        image: Option<String>,

        /// Session id (defaults to "default")
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List the registered tools
    Tools,
}

// NOTE: Command Organization
//
// Everyday reads (list, search, show, export) stay top-level; tooling that is
// not about reading one conversation (mcp, config) is namespaced.

mod commands;

pub use commands::*;

use crate::types::{LogLevel, OutputFormat};
use clap::Parser;

#[derive(Parser)]
#[command(name = "qhistory")]
#[command(about = "Browse, search and export Amazon Q CLI conversation history", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to the Q CLI data.sqlite3 (default: from config, then the platform data dir)"
    )]
    pub db: Option<String>,

    #[arg(long, global = true, help = "Path to config.toml")]
    pub config: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

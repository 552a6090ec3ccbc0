use super::args::{Cli, Commands, ConfigCommand, McpCommand};
use super::handlers;
use crate::logging;
use crate::views::Palette;
use anyhow::{Context, Result};
use qhistory_runtime::{Config, HistoryService};
use std::path::PathBuf;

/// Everything a handler needs besides its own arguments
pub struct ExecutionContext {
    pub format: crate::types::OutputFormat,
    pub palette: Palette,
    pub config: Config,
    pub config_path: PathBuf,
    pub db: Option<String>,
}

impl ExecutionContext {
    /// Open the history service. Fails if the database is unusable.
    pub fn service(&self) -> Result<HistoryService> {
        HistoryService::from_config(&self.config, self.db.as_deref())
            .context("Failed to open the Q CLI conversation store")
    }
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = match &cli.config {
        Some(path) => qhistory_runtime::expand_tilde(path),
        None => Config::default_path()?,
    };
    // `config init` must work even when the existing file is broken
    let config = if matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommand::Init { .. }
        }
    ) {
        Config::default()
    } else {
        Config::load_from(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    };

    let ctx = ExecutionContext {
        format: cli.format,
        palette: Palette::detect(),
        config,
        config_path,
        db: cli.db,
    };

    match cli.command {
        Commands::List { limit } => handlers::list::handle(&ctx, limit),
        Commands::Search { query, limit } => handlers::search::handle(&ctx, &query, limit),
        Commands::Show { id, turns } => handlers::show::handle(&ctx, &id, turns),
        Commands::Export { id, output } => handlers::export::handle(&ctx, &id, output.as_deref()),
        Commands::Doctor => handlers::doctor::handle(&ctx),
        Commands::Mcp { command } => match command {
            McpCommand::Serve => handlers::mcp::handle_serve(&ctx),
        },
        Commands::Config { command } => match command {
            ConfigCommand::Init { force } => handlers::config::handle_init(&ctx, force),
            ConfigCommand::Show => handlers::config::handle_show(&ctx),
        },
    }
}

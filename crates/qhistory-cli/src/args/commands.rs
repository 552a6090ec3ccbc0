use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List conversations, most recent first (order is estimated)")]
    List {
        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Maximum number of conversations (default: 20)"
        )]
        limit: Option<i64>,
    },

    #[command(about = "Search user and assistant text (case-insensitive)")]
    Search {
        query: String,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Maximum number of results (default: 10)"
        )]
        limit: Option<i64>,
    },

    #[command(about = "Show a conversation")]
    Show {
        id: String,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Only show the first N turns"
        )]
        turns: Option<i64>,
    },

    #[command(about = "Export a conversation as markdown")]
    Export {
        id: String,

        #[arg(
            long,
            short,
            help = "Write to this file (.md is appended when missing); default is stdout"
        )]
        output: Option<String>,
    },

    #[command(about = "Report store health: record counts, schema variants, malformed records")]
    Doctor,

    #[command(about = "Model Context Protocol server")]
    Mcp {
        #[command(subcommand)]
        command: McpCommand,
    },

    #[command(about = "Manage the qhistory config file")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum McpCommand {
    #[command(about = "Serve JSON-RPC over stdio")]
    Serve,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Write a config file with default settings")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },

    #[command(about = "Print the effective config and resolved database path")]
    Show,
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod core;
mod mcp;
pub mod ui;

use commands::search;

#[derive(Parser)]
#[command(name = "fsearch")]
#[command(about = "File search for the AI era - keyword and regex matches with context")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search pattern (if no command specified)
    #[arg(value_name = "PATTERN")]
    pattern: Option<String>,

    /// File to search (if no command specified)
    #[arg(value_name = "FILE")]
    file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a file for a keyword or regex pattern
    #[command(alias = "s")]
    Search {
        /// Keyword or regex pattern to search for
        pattern: String,

        /// File to search in
        file: String,

        /// Case-sensitive matching (default is case-insensitive)
        #[arg(short = 's', long)]
        case_sensitive: bool,

        /// Context lines before and after each match
        #[arg(short = 'C', long, default_value = "2")]
        context: usize,

        /// Print the raw JSON report instead of the formatted view
        #[arg(long)]
        json: bool,
    },

    /// Run as MCP server for Claude Code integration
    #[command(name = "mcp-server")]
    McpServer,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search {
            pattern,
            file,
            case_sensitive,
            context,
            json,
        }) => {
            search::run(search::SearchOptions {
                pattern,
                file,
                case_sensitive,
                context,
                json,
            })?;
        }
        Some(Commands::McpServer) => {
            let server = mcp::McpServer::new();
            mcp::run_until_shutdown(server)
                .await
                .context("Failed to start MCP server")?;
        }
        None => {
            if let (Some(pattern), Some(file)) = (cli.pattern, cli.file) {
                search::run(search::SearchOptions {
                    pattern,
                    file,
                    case_sensitive: false,
                    context: 2,
                    json: false,
                })?;
            } else {
                // Show help
                use clap::CommandFactory;
                Cli::command().print_help()?;
            }
        }
    }

    Ok(())
}

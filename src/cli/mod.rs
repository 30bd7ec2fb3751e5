//! CLI module for Strikebot
//!
//! Provides operator commands:
//! - `serve`: Connect to Discord and handle strike commands
//! - `list`: Print the strike file without connecting
//! - `check`: Validate configuration and the strike file

use clap::{Parser, Subcommand};

pub mod check;
pub mod list;

/// Strikebot CLI
#[derive(Parser, Debug)]
#[command(name = "strikebot")]
#[command(about = "Discord strike ledger and moderation bot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the bot
    Serve,
    /// Print recorded strikes
    List,
    /// Validate configuration and the strike file
    Check,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) => crate::server::run().await,
        Some(Commands::List) => list::run().await,
        Some(Commands::Check) => check::run().await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

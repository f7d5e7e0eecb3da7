//! Triage Control - CLI client for the triage daemon
//!
//! Starts a diagnostic session and drives the question loop from the
//! terminal.

mod client;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

const DEFAULT_SERVER: &str = "http://127.0.0.1:7870";

#[derive(Parser)]
#[command(name = "triagectl")]
#[command(about = "Triage - conversational diagnostic assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon base URL
    #[arg(long, global = true, default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a problem and answer questions until a diagnosis
    Ask {
        /// The problem, in your own words
        message: String,
    },

    /// Check daemon health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { message } => commands::ask(&cli.server, &message).await,
        Commands::Health => commands::health(&cli.server).await,
    }
}

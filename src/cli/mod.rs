use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `DualMind` — automated turn-taking dialogue between two LLM personas.
#[derive(Parser, Debug)]
#[command(name = "dualmind")]
#[command(version = "0.1.0")]
#[command(about = "Two AI personas in conversation over a local model server.", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "dualmind.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the conversation loop in the terminal
    Run {
        /// Number of exchanges before stopping (0 = run until CTRL+C)
        #[arg(short = 'n', long, default_value = "0")]
        exchanges: u64,

        /// Override the configured initial message
        #[arg(long)]
        initial: Option<String>,

        /// Directory the conversation log is written into
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,
    },

    /// Serve the web front end
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// List models available on the backend
    Models,
}

//! Command-line interface for shiritori.

use clap::{Parser, Subcommand};
use shiritori::LlmProvider;

/// Shiritori - word-chaining game against an LLM opponent
#[derive(Parser, Debug)]
#[command(name = "shiritori")]
#[command(about = "Word-chaining game server with an LLM opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "shiritori.toml")]
    pub config: std::path::PathBuf,

    /// Override the LLM provider (gemini, openai, anthropic)
    #[arg(long, global = true)]
    pub provider: Option<LlmProvider>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Play a game in the terminal
    Play,
}

//! Shiritori - Unified CLI
//!
//! Serves the word-chaining game over HTTP or plays it in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use shiritori::{
    GameServer, GameSession, LlmClient, LlmOpponent, ServerConfig, SessionManager, TurnOutcome,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut config = ServerConfig::load(&cli.config)?;
    if let Some(provider) = cli.provider {
        config = config.with_provider(provider);
    }

    match cli.command {
        Command::Http { port, host } => {
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(host) = host {
                config = config.with_host(host);
            }
            run_http_server(config).await
        }
        Command::Play => run_terminal_game(config).await,
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shiritori=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Builds the LLM-backed opponent from configuration.
#[instrument(skip(config))]
fn build_opponent(config: &ServerConfig) -> Result<LlmOpponent> {
    let llm_config = config.create_llm_config()?;
    info!(provider = %llm_config.provider(), model = %llm_config.model(), "Initializing LLM client");
    let client = LlmClient::new(llm_config)?;
    Ok(LlmOpponent::new(client))
}

/// Run the HTTP game server
#[instrument(skip(config))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let opponent = Arc::new(build_opponent(&config)?);
    let sessions = SessionManager::new(config.game_rules());
    let app = GameServer::new(sessions, opponent).router();

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;
    info!(host = %config.host(), port = config.port(), "Server ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Play a game on stdin/stdout
#[instrument(skip(config))]
async fn run_terminal_game(config: ServerConfig) -> Result<()> {
    let opponent = build_opponent(&config)?;
    let mut game = GameSession::new("terminal".to_string(), config.game_rules());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Game started! Enter the first word (:new restarts, :quit exits).\n")
        .await?;

    loop {
        let prompt = match game.required_start() {
            Some(c) if !game.is_terminal() => format!("[{}]> ", c),
            _ => "> ".to_string(),
        };
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            ":quit" => break,
            ":new" => {
                game.start();
                stdout.write_all(b"New game. Enter the first word.\n").await?;
                continue;
            }
            _ => {}
        }

        let text = match game.submit_user_word(line, &opponent).await {
            Ok(TurnOutcome::Continue {
                opponent_word,
                next_required_char,
            }) => format!("Opponent: {} (next: {})\n", opponent_word, next_required_char),
            Ok(TurnOutcome::GameOver {
                winner, message, ..
            }) => format!("{}\nWinner: {}. Type :new to play again.\n", message, winner),
            Err(e) => format!("{}\n", e),
        };
        stdout.write_all(text.as_bytes()).await?;
    }

    Ok(())
}

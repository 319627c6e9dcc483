//! Server configuration.

use crate::games::shiritori::{DEFAULT_FORBIDDEN_ENDING, GameRules};
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use unicode_segmentation::UnicodeSegmentation;

/// Configuration for the game server and its opponent.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// LLM provider (gemini, openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name. Defaults to the provider's standard model.
    #[serde(default)]
    llm_model: Option<String>,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Seconds the opponent may take for one move.
    #[serde(default = "default_move_timeout_secs")]
    move_timeout_secs: u64,

    /// Ending that loses the game.
    #[serde(default = "default_forbidden_ending")]
    forbidden_ending: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_max_tokens() -> u32 {
    50
}

fn default_move_timeout_secs() -> u64 {
    30
}

fn default_forbidden_ending() -> String {
    DEFAULT_FORBIDDEN_ENDING.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            llm_provider: default_provider(),
            llm_model: None,
            llm_max_tokens: default_max_tokens(),
            move_timeout_secs: default_move_timeout_secs(),
            forbidden_ending: default_forbidden_ending(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(provider = %config.llm_provider, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    /// The `PORT` environment variable overrides the port either way.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.with_port_from_env(std::env::var("PORT").ok().as_deref())
    }

    /// Applies a `PORT` override value.
    pub fn with_port_from_env(mut self, port: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = port {
            self.port = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT value '{}': {}", raw, e)))?;
            debug!(port = self.port, "Port overridden from environment");
        }
        Ok(self)
    }

    /// Overrides the bind address.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Overrides the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the LLM provider.
    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.llm_provider = provider;
        self
    }

    /// Model to request, falling back to the provider default.
    pub fn model_name(&self) -> String {
        self.llm_model
            .clone()
            .unwrap_or_else(|| self.llm_provider.default_model().to_string())
    }

    /// Opponent time limit per move.
    pub fn move_timeout(&self) -> Duration {
        Duration::from_secs(self.move_timeout_secs)
    }

    /// Game rules derived from this configuration.
    pub fn game_rules(&self) -> GameRules {
        GameRules::new(self.forbidden_ending.clone(), self.move_timeout())
    }

    /// Creates LLM configuration from this config.
    /// Reads the API key from the provider's environment variable.
    #[instrument(skip(self), fields(provider = ?self.llm_provider))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.model_name(),
            self.llm_max_tokens,
            self.move_timeout(),
        ))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.move_timeout_secs == 0 {
            return Err(ConfigError::new(
                "move_timeout_secs must be greater than zero".to_string(),
            ));
        }
        let ending = self.forbidden_ending.as_str();
        if ending.trim() != ending || ending.graphemes(true).count() != 1 {
            return Err(ConfigError::new(format!(
                "forbidden_ending must be exactly one character, got {:?}",
                ending
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

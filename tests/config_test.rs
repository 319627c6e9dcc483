//! Tests for server configuration loading.

use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use shiritori::{LlmProvider, ServerConfig};

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 5000);
    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(config.model_name(), "gemini-1.5-flash");
    assert_eq!(config.forbidden_ending(), "ん");
    assert_eq!(config.move_timeout(), Duration::from_secs(30));
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = ServerConfig::from_toml(
        r#"
port = 8080
llm_provider = "anthropic"
"#,
    )
    .expect("parse");
    assert_eq!(*config.port(), 8080);
    assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
    assert_eq!(config.model_name(), "claude-3-5-haiku-20241022");
    assert_eq!(config.host(), "0.0.0.0");
}

#[test]
fn test_full_toml() {
    let config = ServerConfig::from_toml(
        r#"
host = "127.0.0.1"
port = 3000
llm_provider = "openai"
llm_model = "gpt-4o"
llm_max_tokens = 20
move_timeout_secs = 5
forbidden_ending = "る"
"#,
    )
    .expect("parse");
    assert_eq!(config.model_name(), "gpt-4o");
    assert_eq!(*config.llm_max_tokens(), 20);

    let rules = config.game_rules();
    assert_eq!(rules.forbidden_ending(), "る");
    assert_eq!(*rules.move_timeout(), Duration::from_secs(5));
}

#[test]
fn test_zero_timeout_rejected() {
    let result = ServerConfig::from_toml("move_timeout_secs = 0");
    assert!(result.is_err());
}

#[test]
fn test_invalid_toml_rejected() {
    let result = ServerConfig::from_toml("port = \"not a number\"");
    let err = result.expect_err("should fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shiritori.toml");
    fs::write(&path, "port = 9000\n").expect("Failed to write TOML");

    let config = ServerConfig::from_file(&path).expect("load");
    assert_eq!(*config.port(), 9000);
}

#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = ServerConfig::from_file(dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_port_override() {
    let config = ServerConfig::default()
        .with_port_from_env(Some("7000"))
        .expect("valid port");
    assert_eq!(*config.port(), 7000);

    let unchanged = ServerConfig::default()
        .with_port_from_env(None)
        .expect("no override");
    assert_eq!(*unchanged.port(), 5000);

    assert!(ServerConfig::default().with_port_from_env(Some("abc")).is_err());
}

#[test]
fn test_forbidden_ending_must_be_one_character() {
    for bad in ["", " ", "んん", " ん", "ん "] {
        let toml = format!("forbidden_ending = {:?}", bad);
        let err = ServerConfig::from_toml(&toml).expect_err("should reject");
        assert!(err.message.contains("exactly one character"), "input {bad:?}");
    }

    // A base kana plus combining mark is still one character
    let config = ServerConfig::from_toml("forbidden_ending = \"か\u{3099}\"").expect("parse");
    assert_eq!(config.forbidden_ending(), "か\u{3099}");
}

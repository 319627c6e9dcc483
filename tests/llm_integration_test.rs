//! Integration test for LLM client connectivity.

use std::time::Duration;

use shiritori::llm_client::{LlmClient, LlmConfig, LlmProvider};
use shiritori::{GameRules, GameSession, LlmOpponent, TurnOutcome};
use tracing::instrument;

fn client_for(provider: LlmProvider) -> LlmClient {
    dotenvy::dotenv().ok();

    let api_key = std::env::var(provider.api_key_var())
        .unwrap_or_else(|_| panic!("{} not set", provider.api_key_var()));

    let config = LlmConfig::new(
        provider,
        api_key,
        provider.default_model().to_string(),
        50,
        Duration::from_secs(30),
    );

    LlmClient::new(config).expect("Failed to build client")
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_connectivity() {
    let client = client_for(LlmProvider::Gemini);

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    let client = client_for(LlmProvider::Anthropic);

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_connectivity() {
    let client = client_for(LlmProvider::OpenAI);

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_llm_opponent_plays_a_turn() {
    let opponent = LlmOpponent::new(client_for(LlmProvider::Gemini));
    let mut game = GameSession::new("api".to_string(), GameRules::default());

    // Either outcome is legal; the turn must finish without a gateway error
    let outcome = game
        .submit_user_word("しりとり", &opponent)
        .await
        .expect("turn should run");

    match outcome {
        TurnOutcome::Continue { opponent_word, .. } => eprintln!("Opponent: {}", opponent_word),
        TurnOutcome::GameOver { message, .. } => eprintln!("Game over: {}", message),
    }
    assert_eq!(game.history().len(), 2);
}

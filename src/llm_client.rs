//! LLM API client abstraction for Gemini, OpenAI and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// LLM provider selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LlmProvider {
    /// Google Gemini.
    Gemini,
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-1.5-flash",
            LlmProvider::OpenAI => "gpt-4o-mini",
            LlmProvider::Anthropic => "claude-3-5-haiku-20241022",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(
        provider: LlmProvider,
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            timeout,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        info!("Creating LLM client");
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = ?self.config.provider, model = %self.config.model))]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Generating completion");
        match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(system_prompt, user_message).await,
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message).await,
            LlmProvider::Anthropic => self.generate_anthropic(system_prompt, user_message).await,
        }
    }

    /// Generates a completion using Google Gemini.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_gemini(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Gemini API request");
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.config.model
        );
        let request_body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": user_message }]
                }
            ],
            "generationConfig": { "maxOutputTokens": self.config.max_tokens }
        });

        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", self.config.api_key.clone())
            .json(&request_body);
        let response_json = self.send("Gemini", request).await?;

        let content = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Gemini response");
                LlmError::new("No text content in Gemini response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        let request = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .json(&request_body);
        let response_json = self.send("Anthropic", request).await?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using OpenAI chat completions.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );
        let request = self.openai_request(system_prompt, user_message)?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::new("No content in OpenAI response".to_string()))?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Builds the typed chat completion request sent to OpenAI.
    fn openai_request(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| LlmError::new(format!("Failed to build system message: {}", e)))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| LlmError::new(format!("Failed to build user message: {}", e)))?,
            ),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build request: {}", e)))
    }

    /// Sends a request and parses a successful JSON body.
    #[instrument(skip(self, request))]
    async fn send(
        &self,
        provider: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, LlmError> {
        debug!("Sending request to {}", provider);
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "{} API request failed", provider);
            LlmError::new(format!("{} API request failed: {}", provider, e))
        })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read {} response", provider);
            LlmError::new(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "{} API error", provider);
            return Err(LlmError::new(format!(
                "{} API error {}: {}",
                provider, status, response_text
            )));
        }

        debug!(response_length = response_text.len(), "Parsing {} response", provider);
        serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, response = %response_text, "Failed to parse {} response", provider);
            LlmError::new(format!("Failed to parse response: {}", e))
        })
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_provider_parses_case_insensitive() {
        assert_eq!(LlmProvider::from_str("gemini").ok(), Some(LlmProvider::Gemini));
        assert_eq!(LlmProvider::from_str("OpenAI").ok(), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::from_str("ANTHROPIC").ok(), Some(LlmProvider::Anthropic));
        assert!(LlmProvider::from_str("cohere").is_err());
    }

    #[test]
    fn test_openai_request_carries_model_and_both_messages() {
        let config = LlmConfig::new(
            LlmProvider::OpenAI,
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            50,
            Duration::from_secs(5),
        );
        let client = LlmClient::new(config).expect("client");

        let request = client
            .openai_request("system", "さくら")
            .expect("request should build");

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages.len(), 2);
        assert!(matches!(request.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(request.messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_provider_serde_lowercase() {
        let provider: LlmProvider = serde_json::from_str("\"openai\"").expect("parse");
        assert_eq!(provider, LlmProvider::OpenAI);
        assert_eq!(LlmProvider::Gemini.api_key_var(), "GEMINI_API_KEY");
    }
}

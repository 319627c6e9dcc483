//! The automated opponent: a capability that proposes the next word.
//!
//! The session never talks to a text-generation service directly. It asks an
//! [`OpponentMoveProvider`] for a candidate and validates the answer itself, so
//! the state machine can be driven by [`ScriptedOpponent`] in tests and by
//! [`LlmOpponent`] in production.

use crate::games::shiritori::{UsedWords, Word};
use crate::llm_client::LlmClient;
use async_trait::async_trait;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const SYSTEM_PROMPT: &str = "You are playing shiritori, the Japanese word-chain game. \
Answer with exactly one Japanese word written in hiragana and nothing else.";

/// Snapshot of the game handed to the opponent for one move.
#[derive(Debug, Clone, Getters, new)]
pub struct MoveRequest {
    /// The word the opponent must chain from.
    previous_word: Word,
    /// Every word played so far, including `previous_word`.
    used_words: UsedWords,
    /// Ending the opponent must avoid.
    forbidden_ending: String,
}

/// Produces the opponent's next word.
///
/// Implementations do not check the candidate against the rules; the
/// session does that. Any failure is final for the turn and is never retried.
#[async_trait]
pub trait OpponentMoveProvider: Send + Sync + std::fmt::Debug {
    /// Returns a candidate word or the reason none could be produced.
    async fn get_move(&self, request: &MoveRequest) -> Result<Word, OpponentError>;
}

/// Builds the instruction sent to the text generator.
#[instrument(skip(request), fields(previous = %request.previous_word))]
pub fn build_prompt(request: &MoveRequest) -> String {
    let previous = request.previous_word();
    let last_char = previous.last_char().unwrap_or_default();
    let used = if request.used_words().is_empty() {
        "none".to_string()
    } else {
        request
            .used_words()
            .iter()
            .map(Word::as_str)
            .collect::<Vec<_>>()
            .join("、")
    };

    format!(
        "Follow these rules strictly:\n\
         1. Reply with exactly one word that starts with 「{last_char}」, the last character of 「{previous}」.\n\
         2. Never reply with a word that ends in 「{forbidden}」.\n\
         3. Never reply with a word that has already been used.\n\
         4. Reply with the word only. No explanation.\n\
         \n\
         Already used words: {used}\n\
         \n\
         Your word:",
        forbidden = request.forbidden_ending(),
    )
}

/// Opponent backed by an LLM.
#[derive(Debug, Clone)]
pub struct LlmOpponent {
    client: LlmClient,
}

impl LlmOpponent {
    /// Creates an opponent that asks `client` for each move.
    #[instrument(skip(client))]
    pub fn new(client: LlmClient) -> Self {
        info!("Creating LLM opponent");
        Self { client }
    }
}

#[async_trait]
impl OpponentMoveProvider for LlmOpponent {
    #[instrument(skip(self, request), fields(previous = %request.previous_word()))]
    async fn get_move(&self, request: &MoveRequest) -> Result<Word, OpponentError> {
        let prompt = build_prompt(request);
        debug!(prompt_length = prompt.len(), "Requesting opponent move");

        let text = self
            .client
            .generate(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| OpponentError::new(format!("opponent request failed: {}", e.message)))?;

        let candidate = text.trim();
        if candidate.is_empty() {
            warn!("Opponent returned an empty response");
            return Err(OpponentError::new("empty response from opponent".to_string()));
        }

        info!(candidate, "Opponent proposed a word");
        Ok(Word::new(candidate))
    }
}

/// Opponent that replays canned answers in order.
///
/// `Ok` entries are returned as candidate words, `Err` entries as failures.
/// Once the script runs out every call fails.
#[derive(Debug, Default)]
pub struct ScriptedOpponent {
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<MoveRequest>>,
    delay: Option<Duration>,
}

impl ScriptedOpponent {
    /// Creates an opponent with the given script.
    pub fn new(script: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Creates an opponent that answers with `words` in order.
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(words.into_iter().map(|w| Ok(w.into())))
    }

    /// Waits `delay` before every answer.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Appends an answer to the end of the script.
    pub fn push(&self, answer: Result<String, String>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<MoveRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OpponentMoveProvider for ScriptedOpponent {
    #[instrument(skip(self, request), fields(previous = %request.previous_word()))]
    async fn get_move(&self, request: &MoveRequest) -> Result<Word, OpponentError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(word)) => {
                let candidate = word.trim();
                if candidate.is_empty() {
                    return Err(OpponentError::new("empty response from opponent".to_string()));
                }
                Ok(Word::new(candidate))
            }
            Some(Err(detail)) => Err(OpponentError::new(detail)),
            None => Err(OpponentError::new("opponent script exhausted".to_string())),
        }
    }
}

/// Opponent failure. The message is shown to the player.
#[derive(Debug, Clone, Display, Error)]
#[display("Opponent error: {} at {}:{}", message, file, line)]
pub struct OpponentError {
    /// Failure detail.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl OpponentError {
    /// Creates a new opponent error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "Opponent error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

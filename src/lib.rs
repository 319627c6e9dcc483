//! Shiritori library - word-chaining game against an automated opponent
//!
//! The user and the opponent alternate words. Each word must start with the
//! last character of the previous one, may not repeat, and must not end in
//! the forbidden character. Whoever produces an illegal word loses.
//!
//! # Architecture
//!
//! - **Rules**: [`validate_word`] decides whether a word is legal
//! - **Opponent**: [`OpponentMoveProvider`] proposes the opponent's word (LLM-backed in production)
//! - **Session**: [`GameSession`] is the turn state machine; [`SessionManager`] keys sessions by ID
//! - **Server**: [`GameServer`] exposes sessions over HTTP
//!
//! # Example
//!
//! ```
//! use shiritori::{GameRules, GameSession, ScriptedOpponent, TurnOutcome};
//!
//! # async fn example() -> Result<(), shiritori::GameError> {
//! let opponent = ScriptedOpponent::with_words(["らっぱ"]);
//! let mut game = GameSession::new("demo".to_string(), GameRules::default());
//!
//! match game.submit_user_word("さくら", &opponent).await? {
//!     TurnOutcome::Continue { next_required_char, .. } => assert_eq!(next_required_char, "ぱ"),
//!     TurnOutcome::GameOver { .. } => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
mod opponent;
mod server;
mod session;

pub mod llm_client;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Opponent
pub use opponent::{
    LlmOpponent, MoveRequest, OpponentError, OpponentMoveProvider, ScriptedOpponent, build_prompt,
};

// Crate-level exports - Server types
pub use server::{ApiError, ErrorResponse, GameServer, PlayRequest, START_MESSAGE, StartResponse};

// Crate-level exports - Session management
pub use session::{DEFAULT_SESSION_ID, SessionManager, SharedSession};

// Crate-level exports - Game types
pub use games::shiritori::{
    DEFAULT_FORBIDDEN_ENDING, GameError, GamePhase, GameRules, GameSession, HistoryEntry,
    InvalidReason, SessionId, Side, StatusSnapshot, TurnOutcome, TurnResponse, TurnStatus,
    UsedWords, VALID_WORD_MESSAGE, Word, validate_word,
};

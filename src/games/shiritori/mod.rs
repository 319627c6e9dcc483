mod game;
mod rules;
mod types;

pub use game::{
    GameError, GamePhase, GameSession, SessionId, StatusSnapshot, TurnOutcome, TurnResponse,
    TurnStatus,
};
pub use rules::{InvalidReason, validate_word};
pub use types::{
    DEFAULT_FORBIDDEN_ENDING, GameRules, HistoryEntry, Side, UsedWords, VALID_WORD_MESSAGE, Word,
};

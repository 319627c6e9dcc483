//! The shiritori session state machine.

use super::rules::{InvalidReason, validate_word};
use super::types::{GameRules, HistoryEntry, Side, UsedWords, Word};
use crate::opponent::{MoveRequest, OpponentMoveProvider};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the user's next word.
    AwaitingUserMove,
    /// Game over. Only a restart leaves this phase.
    Terminal {
        /// The side that did not forfeit.
        winner: Side,
    },
}

/// Misuse of the session API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A word was submitted after the game ended.
    #[display("The game is over. Start a new game.")]
    GameAlreadyOver,
}

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Both words were accepted and play continues.
    Continue {
        /// The opponent's accepted word.
        opponent_word: Word,
        /// Character the user's next word must start with.
        next_required_char: String,
    },
    /// Someone forfeited.
    GameOver {
        /// The side that did not forfeit.
        winner: Side,
        /// The opponent's word. `None` if the user forfeited, empty if the
        /// opponent failed to answer.
        opponent_word: Option<String>,
        /// Why the game ended.
        message: String,
    },
}

/// Turn status as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// Play continues.
    Continue,
    /// The game has ended.
    GameOver,
}

/// Serializable result of a user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Whether play continues.
    pub status: TurnStatus,
    /// Winner, when the game ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    /// The opponent's word, if it got to answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_word: Option<String>,
    /// Required first character for the next user word.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_required_char: Option<String>,
    /// Human-readable summary.
    pub message: String,
    /// Full history after the turn.
    pub history: Vec<HistoryEntry>,
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// True once someone has forfeited.
    pub terminal: bool,
    /// Winner, if the game is over.
    pub winner: Option<Side>,
    /// Words played so far.
    pub used_words: UsedWords,
    /// Most recent accepted word, empty before the first move.
    pub last_word: String,
    /// Every submission in order.
    pub history: Vec<HistoryEntry>,
}

/// One shiritori game between the user and the automated opponent.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    rules: GameRules,
    phase: GamePhase,
    used_words: UsedWords,
    last_word: Option<Word>,
    history: Vec<HistoryEntry>,
}

impl GameSession {
    /// Creates a fresh session awaiting the user's first word.
    #[instrument(skip(rules))]
    pub fn new(id: SessionId, rules: GameRules) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            rules,
            phase: GamePhase::AwaitingUserMove,
            used_words: UsedWords::new(),
            last_word: None,
            history: Vec::new(),
        }
    }

    /// Session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rules in force.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// True once someone has forfeited.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::Terminal { .. })
    }

    /// Winner, if the game is over.
    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            GamePhase::Terminal { winner } => Some(winner),
            GamePhase::AwaitingUserMove => None,
        }
    }

    /// Words played so far.
    pub fn used_words(&self) -> &UsedWords {
        &self.used_words
    }

    /// Most recent accepted word.
    pub fn last_word(&self) -> Option<&Word> {
        self.last_word.as_ref()
    }

    /// Submission log.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Character the user's next word must start with, if any.
    pub fn required_start(&self) -> Option<&str> {
        self.last_word.as_ref().and_then(Word::last_char)
    }

    /// Discards all progress and starts over.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self) {
        info!("Starting new game");
        self.phase = GamePhase::AwaitingUserMove;
        self.used_words.clear();
        self.last_word = None;
        self.history.clear();
    }

    /// Plays one full turn: the user's word, then the opponent's reply.
    ///
    /// The opponent call is bounded by the session's move timeout. A
    /// timeout, a provider failure, or an illegal reply all forfeit the
    /// game to the user.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameAlreadyOver`] without touching state if the
    /// game has already ended.
    #[instrument(skip(self, opponent), fields(session_id = %self.id))]
    pub async fn submit_user_word<P>(
        &mut self,
        word: &str,
        opponent: &P,
    ) -> Result<TurnOutcome, GameError>
    where
        P: OpponentMoveProvider + ?Sized,
    {
        if self.is_terminal() {
            warn!("Word submitted after game over");
            return Err(GameError::GameAlreadyOver);
        }

        let user_word = Word::new(word.trim());
        let required = self.required_start().map(str::to_string);

        if let Err(reason) = validate_word(
            &user_word,
            required.as_deref(),
            &self.used_words,
            self.rules.forbidden_ending(),
        ) {
            info!(word = %user_word, reason = %reason, "User word rejected");
            return Ok(self.forfeit(Side::User, user_word.to_string(), reason.to_string(), None));
        }

        debug!(word = %user_word, "User word accepted");
        let user_entry = HistoryEntry::new_accepted(Side::User, &user_word);
        let mut used_after_user = self.used_words.clone();
        used_after_user.insert(user_word.clone());

        let request = MoveRequest::new(
            user_word.clone(),
            used_after_user,
            self.rules.forbidden_ending().clone(),
        );
        let timeout = *self.rules.move_timeout();
        let reply = match tokio::time::timeout(timeout, opponent.get_move(&request)).await {
            Ok(reply) => reply.map_err(|e| e.message),
            Err(_) => Err(format!("opponent timed out after {:?}", timeout)),
        };

        // Nothing is written before this point, so a dropped turn leaves the
        // session exactly as it was.
        self.record(user_entry, user_word.clone());

        let candidate = match reply {
            Ok(candidate) => candidate,
            Err(detail) => {
                warn!(detail = %detail, "Opponent failed to answer");
                let message = format!("The opponent failed to answer: {}", detail);
                return Ok(self.forfeit(Side::Opponent, String::new(), message, Some(String::new())));
            }
        };

        if let Err(reason) = validate_word(
            &candidate,
            user_word.last_char(),
            &self.used_words,
            self.rules.forbidden_ending(),
        ) {
            info!(word = %candidate, reason = %reason, "Opponent word rejected");
            let message = opponent_forfeit_message(&reason);
            let text = candidate.to_string();
            return Ok(self.forfeit(Side::Opponent, text.clone(), message, Some(text)));
        }

        let Some(next_required_char) = candidate.last_char().map(str::to_string) else {
            let message = opponent_forfeit_message(&InvalidReason::Empty);
            return Ok(self.forfeit(Side::Opponent, String::new(), message, Some(String::new())));
        };
        self.record(HistoryEntry::new_accepted(Side::Opponent, &candidate), candidate.clone());
        info!(word = %candidate, next = %next_required_char, "Opponent word accepted");

        Ok(TurnOutcome::Continue {
            opponent_word: candidate,
            next_required_char,
        })
    }

    /// Same as [`submit_user_word`](Self::submit_user_word), packaged for clients.
    #[instrument(skip(self, opponent), fields(session_id = %self.id))]
    pub async fn play_turn<P>(&mut self, word: &str, opponent: &P) -> Result<TurnResponse, GameError>
    where
        P: OpponentMoveProvider + ?Sized,
    {
        let outcome = self.submit_user_word(word, opponent).await?;
        Ok(self.respond(outcome))
    }

    /// Builds the client-facing response for an outcome.
    pub fn respond(&self, outcome: TurnOutcome) -> TurnResponse {
        let history = self.history.clone();
        match outcome {
            TurnOutcome::Continue {
                opponent_word,
                next_required_char,
            } => TurnResponse {
                status: TurnStatus::Continue,
                winner: None,
                message: format!("Opponent played: {}", opponent_word),
                opponent_word: Some(opponent_word.to_string()),
                next_required_char: Some(next_required_char),
                history,
            },
            TurnOutcome::GameOver {
                winner,
                opponent_word,
                message,
            } => TurnResponse {
                status: TurnStatus::GameOver,
                winner: Some(winner),
                opponent_word,
                next_required_char: None,
                message,
                history,
            },
        }
    }

    /// Read-only snapshot of the session.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            terminal: self.is_terminal(),
            winner: self.winner(),
            used_words: self.used_words.clone(),
            last_word: self
                .last_word
                .as_ref()
                .map(Word::to_string)
                .unwrap_or_default(),
            history: self.history.clone(),
        }
    }

    fn record(&mut self, entry: HistoryEntry, word: Word) {
        self.history.push(entry);
        self.used_words.insert(word.clone());
        self.last_word = Some(word);
    }

    fn forfeit(
        &mut self,
        loser: Side,
        word: String,
        message: String,
        opponent_word: Option<String>,
    ) -> TurnOutcome {
        let winner = loser.other();
        self.history
            .push(HistoryEntry::new_rejected(loser, word, message.clone()));
        self.phase = GamePhase::Terminal { winner };
        info!(winner = %winner, "Game over");
        TurnOutcome::GameOver {
            winner,
            opponent_word,
            message,
        }
    }
}

fn opponent_forfeit_message(reason: &InvalidReason) -> String {
    format!("The opponent played an invalid word. {}. You win!", reason)
}

//! Game session registry.

use crate::games::shiritori::{GameRules, GameSession, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

/// Session used when a client does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Shared handle to one session.
///
/// The async mutex is held for the whole turn, including the wait on the
/// opponent, so turns on the same session run strictly one after another.
pub type SharedSession = Arc<tokio::sync::Mutex<GameSession>>;

/// Manages all game sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    rules: GameRules,
    sessions: Arc<Mutex<HashMap<SessionId, SharedSession>>>,
}

impl SessionManager {
    /// Creates a new session manager. New sessions get `rules`.
    #[instrument(skip(rules))]
    pub fn new(rules: GameRules) -> Self {
        info!("Creating session manager");
        Self {
            rules,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Rules given to new sessions.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Returns the session with `id`, creating it if needed.
    #[instrument(skip(self))]
    pub fn get_or_create(&self, id: &str) -> SharedSession {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!(session_id = id, "Created new session");
                Arc::new(tokio::sync::Mutex::new(GameSession::new(
                    id.to_string(),
                    self.rules.clone(),
                )))
            })
            .clone()
    }

    /// Returns the well-known default session.
    pub fn default_session(&self) -> SharedSession {
        self.get_or_create(DEFAULT_SESSION_ID)
    }

    /// Gets a session by ID.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get(id).cloned();

        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }

        session
    }

    /// Drops a session. Returns `true` if it existed.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = sessions.remove(id).is_some();
        debug!(session_id = id, removed, "Removed session");
        removed
    }

    /// Lists all active session IDs, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        info!(count = ids.len(), "Listed sessions");
        ids
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(GameRules::default())
    }
}

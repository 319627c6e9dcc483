//! HTTP gateway for game sessions.

use crate::games::shiritori::{GameError, SessionId, StatusSnapshot, TurnResponse};
use crate::opponent::OpponentMoveProvider;
use crate::session::{DEFAULT_SESSION_ID, SessionManager};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Message returned when a game starts.
pub const START_MESSAGE: &str = "Game started! Enter the first word.";

/// Request for playing a word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    /// The user's word.
    #[serde(default)]
    pub word: String,
}

/// Response for starting a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    /// Always `"success"`.
    pub status: String,
    /// Greeting for the player.
    pub message: String,
}

/// Error body returned for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// What went wrong.
    pub message: String,
}

/// Gateway error mapped onto an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The session rejected the request.
    Game(GameError),
    /// No session with this ID has been started.
    SessionNotFound(SessionId),
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Game(err @ GameError::GameAlreadyOver) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            ApiError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("No session named 「{}」", id))
            }
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Main server handler.
#[derive(Debug, Clone)]
pub struct GameServer {
    sessions: SessionManager,
    opponent: Arc<dyn OpponentMoveProvider>,
}

impl GameServer {
    /// Creates a server over a shared session registry.
    #[instrument(skip(sessions, opponent))]
    pub fn new(sessions: SessionManager, opponent: Arc<dyn OpponentMoveProvider>) -> Self {
        info!("Creating game server");
        Self { sessions, opponent }
    }

    /// Session registry.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Builds the HTTP routes.
    ///
    /// Bare routes address the default session; `/sessions/{session_id}/…`
    /// addresses a named one.
    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/start_game", post(start_default))
            .route("/play", post(play_default))
            .route("/game_status", get(status_default))
            .route("/sessions/{session_id}/start_game", post(start_named))
            .route("/sessions/{session_id}/play", post(play_named))
            .route("/sessions/{session_id}/game_status", get(status_named))
            .with_state(self)
    }

    /// Resets a session and returns the greeting.
    #[instrument(skip(self))]
    pub async fn start_game(&self, session_id: &str) -> StartResponse {
        let session = self.sessions.get_or_create(session_id);
        session.lock().await.start();
        StartResponse {
            status: "success".to_string(),
            message: START_MESSAGE.to_string(),
        }
    }

    /// Plays one turn in a session.
    #[instrument(skip(self))]
    pub async fn play(&self, session_id: &str, word: &str) -> Result<TurnResponse, GameError> {
        let session = self.sessions.get_or_create(session_id);
        let mut game = session.lock().await;
        let response = game.play_turn(word, self.opponent.as_ref()).await;
        match &response {
            Ok(turn) => debug!(status = ?turn.status, "Turn completed"),
            Err(e) => warn!(error = %e, "Turn rejected"),
        }
        response
    }

    /// Reads a session's state.
    ///
    /// Reads never create sessions; only the default session answers
    /// before it has been started or played.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SessionNotFound`] for an unknown named session.
    #[instrument(skip(self))]
    pub async fn status(&self, session_id: &str) -> Result<StatusSnapshot, ApiError> {
        let session = if session_id == DEFAULT_SESSION_ID {
            self.sessions.default_session()
        } else {
            self.sessions
                .get_session(session_id)
                .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?
        };
        let game = session.lock().await;
        Ok(game.status())
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn start_default(State(server): State<GameServer>) -> Json<StartResponse> {
    Json(server.start_game(DEFAULT_SESSION_ID).await)
}

async fn start_named(
    State(server): State<GameServer>,
    Path(session_id): Path<String>,
) -> Json<StartResponse> {
    Json(server.start_game(&session_id).await)
}

async fn play_default(
    State(server): State<GameServer>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    Ok(Json(server.play(DEFAULT_SESSION_ID, &req.word).await?))
}

async fn play_named(
    State(server): State<GameServer>,
    Path(session_id): Path<String>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    Ok(Json(server.play(&session_id, &req.word).await?))
}

async fn status_default(
    State(server): State<GameServer>,
) -> Result<Json<StatusSnapshot>, ApiError> {
    Ok(Json(server.status(DEFAULT_SESSION_ID).await?))
}

async fn status_named(
    State(server): State<GameServer>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusSnapshot>, ApiError> {
    Ok(Json(server.status(&session_id).await?))
}

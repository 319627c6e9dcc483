//! Tests for the session registry.

use std::sync::Arc;
use std::time::Duration;

use shiritori::{
    DEFAULT_SESSION_ID, GameRules, ScriptedOpponent, SessionManager, Side, TurnStatus,
};

#[tokio::test]
async fn test_get_or_create_returns_same_session() {
    let manager = SessionManager::default();
    let a = manager.get_or_create("room");
    let b = manager.get_or_create("room");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(manager.list_sessions(), ["room"]);
}

#[tokio::test]
async fn test_default_session_uses_well_known_id() {
    let manager = SessionManager::default();
    let session = manager.default_session();
    assert_eq!(session.lock().await.id(), DEFAULT_SESSION_ID);
    assert!(manager.get_session(DEFAULT_SESSION_ID).is_some());
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let manager = SessionManager::default();
    let opponent = ScriptedOpponent::with_words(["らっぱ"]);

    let first = manager.get_or_create("first");
    first
        .lock()
        .await
        .submit_user_word("さくら", &opponent)
        .await
        .expect("turn");

    let second = manager.get_or_create("second");
    let status = second.lock().await.status();
    assert!(status.history.is_empty());
    assert_eq!(first.lock().await.status().history.len(), 2);
}

#[tokio::test]
async fn test_new_sessions_inherit_rules() {
    let rules = GameRules::default().with_forbidden_ending("る");
    let manager = SessionManager::new(rules.clone());
    let session = manager.get_or_create("x");
    assert_eq!(session.lock().await.rules(), &rules);
}

#[tokio::test]
async fn test_remove_session() {
    let manager = SessionManager::default();
    manager.get_or_create("gone");
    assert!(manager.remove_session("gone"));
    assert!(!manager.remove_session("gone"));
    assert!(manager.get_session("gone").is_none());
}

#[tokio::test]
async fn test_concurrent_submissions_are_serialized() {
    let manager = SessionManager::default();
    let opponent = Arc::new(
        ScriptedOpponent::with_words(["らっぱ"]).delayed(Duration::from_millis(50)),
    );

    let mut handles = Vec::new();
    for _ in 0..2 {
        let session = manager.default_session();
        let opponent = Arc::clone(&opponent);
        handles.push(tokio::spawn(async move {
            let mut game = session.lock().await;
            game.play_turn("さくら", opponent.as_ref()).await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("task panicked"));
    }

    // One turn ran to completion; the other saw its result (duplicate word, game over)
    let continued = results
        .iter()
        .filter(|r| matches!(r, Ok(resp) if resp.status == TurnStatus::Continue))
        .count();
    assert_eq!(continued, 1);

    let status = manager.default_session().lock().await.status();
    assert!(status.terminal);
    assert_eq!(status.winner, Some(Side::Opponent));
    assert_eq!(status.history.len(), 3);
    assert!(*status.history[0].accepted());
    assert!(*status.history[1].accepted());
    assert!(!*status.history[2].accepted());
}

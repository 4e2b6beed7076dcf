use crate::{
    JsonSessionStore, SessionError, SessionStore, SkiSession,
    tests::doubles::finished_session,
};

use chrono::TimeDelta;

fn session_ending_after(minutes: i64) -> SkiSession {
    let mut session = finished_session(1.0, 10.0, 20.0, 600);
    session.end_at += TimeDelta::minutes(minutes);
    session
}

/// WHAT: A fresh directory reads as empty history
/// WHY: First launch has no sessions file yet
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_empty_dir_when_loading_then_no_sessions() {
    // Given: An empty data directory
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path());

    // When: Loading history
    let sessions = store.load_sessions().await.unwrap();

    // Then: Nothing stored, nothing created
    assert!(sessions.is_empty());
    assert!(!store.path().exists());
}

/// WHAT: Saved sessions load back newest first
/// WHY: The history list shows the latest run on top
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_saved_sessions_when_loading_then_newest_first() {
    // Given: Two sessions saved oldest first
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path().join("nested"));
    let older = session_ending_after(0);
    let newer = session_ending_after(30);

    // When: Saving and loading
    store.save_session(&older).await.unwrap();
    store.save_session(&newer).await.unwrap();
    let sessions = store.load_sessions().await.unwrap();

    // Then: Newest comes first and no temp file is left behind
    assert_eq!(sessions, vec![newer, older]);
    assert!(!store.path().with_extension("json.tmp").exists());
}

/// WHAT: Saving an existing id replaces it
/// WHY: Retrying a save must not duplicate the run
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_existing_session_when_saving_same_id_then_replaced() {
    // Given: A stored session
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path());
    let mut session = session_ending_after(0);
    store.save_session(&session).await.unwrap();

    // When: Saving it again with new figures
    session.distance_km = 9.9;
    store.save_session(&session).await.unwrap();

    // Then: One entry with the new figures
    let sessions = store.load_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].distance_km, 9.9);
}

/// WHAT: Pruning keeps only the newest sessions
/// WHY: History is capped at a maximum count
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_five_sessions_when_pruning_to_two_then_newest_two_kept() {
    // Given: Five sessions
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path());
    let sessions: Vec<SkiSession> = (0..5).map(|i| session_ending_after(i * 10)).collect();
    for session in &sessions {
        store.save_session(session).await.unwrap();
    }

    // When: Pruning to two
    let removed = store.prune_to_limit(2).await.unwrap();

    // Then: Three removed, the two newest remain
    assert_eq!(removed, 3);
    let kept = store.load_sessions().await.unwrap();
    assert_eq!(kept, vec![sessions[4].clone(), sessions[3].clone()]);
}

/// WHAT: Pruning under the limit leaves history alone
/// WHY: No rewrite is needed when within bounds
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_history_under_limit_when_pruning_then_nothing_removed() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path());
    store.save_session(&session_ending_after(0)).await.unwrap();

    let removed = store.prune_to_limit(100).await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(store.load_sessions().await.unwrap().len(), 1);
}

/// WHAT: A corrupt history file is reported as a format error
/// WHY: Callers must be able to tell corruption from IO failure
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_corrupt_file_when_loading_then_store_format_error() {
    // Given: Garbage in the history file
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path());
    std::fs::write(store.path(), "{ not json").unwrap();

    // When: Loading
    let result = store.load_sessions().await;

    // Then: Format error
    assert!(matches!(result, Err(SessionError::StoreFormat { .. })));
}

/// WHAT: Saving over a corrupt history keeps the new session
/// WHY: One bad file must not silently drop every later run
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_corrupt_file_when_saving_then_session_kept_and_old_file_moved_aside() {
    // Given: Garbage in the history file
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSessionStore::new(dir.path());
    std::fs::write(store.path(), "{ not json").unwrap();
    let session = finished_session(4.0, 16.0, 28.0, 900);

    // When: Saving a session
    store.save_session(&session).await.unwrap();

    // Then: The history holds the new session and the bad file is preserved
    assert_eq!(store.load_sessions().await.unwrap(), vec![session]);
    let corrupt = dir.path().join("sessions.json.corrupt");
    assert_eq!(std::fs::read_to_string(corrupt).unwrap(), "{ not json");
}

/// WHAT: Sessions serialize with camelCase keys
/// WHY: The history file format is shared with other clients
#[test]
#[allow(clippy::unwrap_used)]
fn given_session_when_serializing_then_camel_case_keys() {
    let session = finished_session(5.2, 14.0, 22.0, 1500);

    let json = serde_json::to_value(&session).unwrap();

    assert_eq!(json["distanceKm"], 5.2);
    assert_eq!(json["durationSec"], 1500);
    assert_eq!(json["resortId"], 42);
    assert!(json["elevationDropM"].is_null());
}

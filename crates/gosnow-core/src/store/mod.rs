//! Local session history.

mod json_store;

pub use json_store::JsonSessionStore;

use crate::{CoreResult, session::SkiSession};

use async_trait::async_trait;

/// Sessions retained by default when pruning history.
pub const DEFAULT_MAX_SESSIONS: usize = 100;

/// Local store collaborator for completed sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a completed session. Saving an existing id replaces it.
    async fn save_session(&self, session: &SkiSession) -> CoreResult<()>;

    /// Trim history to the newest `max_sessions`. Returns how many were removed.
    async fn prune_to_limit(&self, max_sessions: usize) -> CoreResult<usize>;

    /// All stored sessions, newest first.
    async fn load_sessions(&self) -> CoreResult<Vec<SkiSession>>;
}

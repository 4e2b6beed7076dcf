use crate::{CoreResult, SessionError, session::SkiSession, store::SessionStore};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

const HISTORY_FILE: &str = "sessions.json";
const CORRUPT_EXTENSION: &str = "json.corrupt";

/// Session history kept in a single JSON file.
///
/// Every write rewrites the file atomically (temp file, fsync, rename) so a
/// crash mid-write leaves the previous history intact. Writers are
/// serialized through an async mutex; file IO runs on the blocking pool.
pub struct JsonSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSessionStore {
    /// Create a store keeping its history under `data_dir`.
    ///
    /// Nothing touches the filesystem until the first write.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(HISTORY_FILE),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn with_history<T, F>(&self, f: F) -> CoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> CoreResult<T> + Send + 'static,
    {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || f(&path))
            .await
            .map_err(|e| SessionError::StoreIo {
                path: self.path.clone(),
                source: std::io::Error::other(e),
                location: ErrorLocation::from(Location::caller()),
            })?
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn save_session(&self, session: &SkiSession) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let session = session.clone();

        let count = self
            .with_history(move |path| {
                let mut sessions = read_history_or_quarantine(path)?;
                sessions.retain(|s| s.id != session.id);
                sessions.push(session);
                newest_first(&mut sessions);
                write_history(path, &sessions)?;
                Ok(sessions.len())
            })
            .await?;

        info!(stored = count, "Session saved");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn prune_to_limit(&self, max_sessions: usize) -> CoreResult<usize> {
        let _guard = self.write_lock.lock().await;

        let removed = self
            .with_history(move |path| {
                let mut sessions = read_history_or_quarantine(path)?;
                if sessions.len() <= max_sessions {
                    return Ok(0);
                }

                newest_first(&mut sessions);
                let removed = sessions.len() - max_sessions;
                sessions.truncate(max_sessions);
                write_history(path, &sessions)?;
                Ok(removed)
            })
            .await?;

        if removed > 0 {
            info!(removed, max_sessions, "Session history pruned");
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn load_sessions(&self) -> CoreResult<Vec<SkiSession>> {
        self.with_history(|path| {
            let mut sessions = read_history(path)?;
            newest_first(&mut sessions);
            Ok(sessions)
        })
        .await
    }
}

fn newest_first(sessions: &mut [SkiSession]) {
    sessions.sort_by(|a, b| b.end_at.cmp(&a.end_at));
}

#[track_caller]
fn read_history(path: &Path) -> CoreResult<Vec<SkiSession>> {
    if !path.exists() {
        debug!(path = ?path, "No session history yet");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| SessionError::StoreIo {
        path: path.to_path_buf(),
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&contents)?)
}

/// Read the history for a rewrite.
///
/// An undecodable file is moved aside to `sessions.json.corrupt` and the
/// history restarts empty, so later saves are not lost with it.
#[track_caller]
fn read_history_or_quarantine(path: &Path) -> CoreResult<Vec<SkiSession>> {
    match read_history(path) {
        Err(SessionError::StoreFormat { source, .. }) => {
            let corrupt_path = path.with_extension(CORRUPT_EXTENSION);

            fs::rename(path, &corrupt_path).map_err(|e| SessionError::StoreIo {
                path: path.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

            warn!(
                path = ?path,
                corrupt_path = ?corrupt_path,
                error = %source,
                "Session history unreadable, moved aside and starting fresh"
            );

            Ok(Vec::new())
        }
        other => other,
    }
}

#[track_caller]
fn write_history(path: &Path, sessions: &[SkiSession]) -> CoreResult<()> {
    let io_error = |source: std::io::Error| SessionError::StoreIo {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_error)?;
    }

    let contents = serde_json::to_vec_pretty(sessions)?;

    // Atomic write: write to temp file then rename
    let temp_path = path.with_extension("json.tmp");

    let mut temp_file = fs::File::create(&temp_path).map_err(io_error)?;
    temp_file.write_all(&contents).map_err(io_error)?;
    temp_file.sync_all().map_err(io_error)?;
    fs::rename(&temp_path, path).map_err(io_error)?;

    debug!(path = ?path, count = sessions.len(), "Session history written");

    Ok(())
}

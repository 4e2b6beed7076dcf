use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the session history failed.
    #[error("Session store IO error at {path:?}: {source} {location}")]
    StoreIo {
        /// File the store was working on.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The session history could not be encoded or decoded.
    #[error("Session store format error: {source} {location}")]
    StoreFormat {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder collaborator failed to start or stop.
    #[error("Recorder failed: {reason} {location}")]
    RecorderFailed {
        /// Description of the recorder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The controller's background task is gone.
    #[error("Recording controller closed {location}")]
    ControllerClosed {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A GPX track could not be loaded for replay.
    #[error("GPX replay failed: {reason} {location}")]
    ReplayFailed {
        /// Description of the replay failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<serde_json::Error> for SessionError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        SessionError::StoreFormat {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;

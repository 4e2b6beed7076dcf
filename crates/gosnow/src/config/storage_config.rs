use crate::config::default_max_sessions;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Session history storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the session history (None = platform data directory).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Sessions kept after each save.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_sessions: default_max_sessions(),
        }
    }
}

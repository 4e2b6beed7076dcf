use crate::config::default_replay_speedup;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// GPX replay used as the location feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// GPX track to replay (None = no location feed).
    #[serde(default)]
    pub gpx_path: Option<PathBuf>,

    /// Playback speed multiplier, at least 1.0.
    #[serde(default = "default_replay_speedup")]
    pub speedup: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            gpx_path: None,
            speedup: default_replay_speedup(),
        }
    }
}

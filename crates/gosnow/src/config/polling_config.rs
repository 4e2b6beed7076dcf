use crate::config::{default_active_interval_ms, default_idle_interval_ms};

use std::time::Duration;

use gosnow_core::PollingCadence;
use serde::{Deserialize, Serialize};

/// Recorder polling intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Poll interval while recording or paused, in milliseconds.
    #[serde(default = "default_active_interval_ms")]
    pub active_interval_ms: u64,

    /// Poll interval while idle, in milliseconds.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
}

impl PollingConfig {
    /// The controller cadence these intervals describe.
    pub fn cadence(&self) -> PollingCadence {
        PollingCadence {
            active: Duration::from_millis(self.active_interval_ms),
            idle: Duration::from_millis(self.idle_interval_ms),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            active_interval_ms: default_active_interval_ms(),
            idle_interval_ms: default_idle_interval_ms(),
        }
    }
}

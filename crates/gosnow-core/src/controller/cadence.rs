use crate::session::RecordingState;

use std::time::Duration;

/// Poll interval while a session is open.
pub const DEFAULT_ACTIVE_INTERVAL: Duration = Duration::from_millis(500);

/// Poll interval while idle.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(2000);

/// Adaptive polling intervals: fast during a session, slow otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingCadence {
    /// Interval while recording or paused.
    pub active: Duration,
    /// Interval in every other state.
    pub idle: Duration,
}

impl PollingCadence {
    /// Interval to wait after a synchronization that observed `state`.
    pub fn interval_for(&self, state: RecordingState) -> Duration {
        if state.is_active() {
            self.active
        } else {
            self.idle
        }
    }
}

impl Default for PollingCadence {
    fn default() -> Self {
        Self {
            active: DEFAULT_ACTIVE_INTERVAL,
            idle: DEFAULT_IDLE_INTERVAL,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No session in progress.
    #[default]
    Idle,
    /// Tracking position and accumulating metrics.
    Recording,
    /// Session open but not accumulating.
    Paused,
    /// Session just ended. Folds back to `Idle` once summarized.
    Stopped,
}

/// A lifecycle request against a [`RecordingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Begin a new session.
    Start,
    /// Suspend accumulation.
    Pause,
    /// Continue after a pause.
    Resume,
    /// End the session.
    Stop,
}

impl RecordingState {
    /// Returns the state reached by `transition`, or `None` when the
    /// transition is undefined from this state.
    pub fn apply(self, transition: Transition) -> Option<RecordingState> {
        use RecordingState::*;

        match (self, transition) {
            (Idle, Transition::Start) => Some(Recording),
            (Recording, Transition::Pause) => Some(Paused),
            (Paused, Transition::Resume) => Some(Recording),
            (Recording | Paused, Transition::Stop) => Some(Stopped),
            _ => None,
        }
    }

    /// True while a session is open (recording or paused).
    pub fn is_active(self) -> bool {
        matches!(self, RecordingState::Recording | RecordingState::Paused)
    }

    /// The state observers should see. `Stopped` is transient.
    pub fn settled(self) -> RecordingState {
        match self {
            RecordingState::Stopped => RecordingState::Idle,
            other => other,
        }
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordingState::Idle => "idle",
            RecordingState::Recording => "recording",
            RecordingState::Paused => "paused",
            RecordingState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

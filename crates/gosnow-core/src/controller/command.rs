use crate::{
    CoreResult,
    controller::StoppedSession,
    session::ResortId,
};

use tokio::sync::oneshot;

/// Requests sent from a [`RecordingController`](crate::RecordingController)
/// handle to its polling task.
#[derive(Debug)]
pub(crate) enum ControllerCommand {
    /// Begin a session.
    Start {
        resort_id: Option<ResortId>,
        reply: oneshot::Sender<CoreResult<()>>,
    },
    /// Pause the open session.
    Pause { reply: oneshot::Sender<()> },
    /// Resume the paused session.
    Resume { reply: oneshot::Sender<()> },
    /// End the session and summarize it.
    Stop {
        reply: oneshot::Sender<CoreResult<Option<StoppedSession>>>,
    },
    /// Synchronize now, outside the timer.
    Refresh { reply: oneshot::Sender<()> },
    /// End the polling task.
    Shutdown,
}

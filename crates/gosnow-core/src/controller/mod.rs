//! Recording session controller.
//!
//! Bridges a [`SessionRecorder`] to an observable [`LiveMetrics`] snapshot
//! and sequences the start/pause/resume/stop lifecycle. One background task
//! per controller polls the recorder on an adaptive cadence and is the only
//! writer of the snapshot; handles talk to it over a command channel.

mod cadence;
mod command;
mod worker;

pub use cadence::{DEFAULT_ACTIVE_INTERVAL, DEFAULT_IDLE_INTERVAL, PollingCadence};

pub(crate) use {command::ControllerCommand, worker::ControllerWorker};

use crate::{
    CoreResult, SessionError,
    recorder::SessionRecorder,
    session::{LiveMetrics, ResortId, SessionSummary, SkiSession},
    store::{DEFAULT_MAX_SESSIONS, SessionStore},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, instrument, warn};

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Tuning for a [`RecordingController`].
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Poll intervals.
    pub cadence: PollingCadence,
    /// History size kept after each save.
    pub max_sessions: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            cadence: PollingCadence::default(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// A finished session and its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedSession {
    /// Figures for presentation.
    pub summary: SessionSummary,
    /// The record handed to the store.
    pub session: SkiSession,
}

/// Handle to a running recording controller.
///
/// Lifecycle calls that are undefined in the current state (pausing while
/// idle, starting twice) are no-ops rather than errors. A second `start`
/// while a session is open is ignored. Errors from the recorder's own
/// `start`/`stop` pass through unchanged.
///
/// Dropping the handle ends the polling task; [`shutdown`](Self::shutdown)
/// does the same and waits for it.
pub struct RecordingController {
    command_tx: mpsc::Sender<ControllerCommand>,
    metrics_rx: watch::Receiver<LiveMetrics>,
    worker: JoinHandle<()>,
}

impl RecordingController {
    /// Spawn the polling task. Must be called inside a Tokio runtime.
    pub fn new(
        recorder: Arc<dyn SessionRecorder>,
        store: Arc<dyn SessionStore>,
        options: ControllerOptions,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (metrics_tx, metrics_rx) = watch::channel(LiveMetrics::default());

        let worker = ControllerWorker {
            recorder,
            store,
            max_sessions: options.max_sessions,
            cadence: options.cadence,
            metrics_tx,
            command_rx,
        };

        Self {
            command_tx,
            metrics_rx,
            worker: tokio::spawn(worker.run()),
        }
    }

    /// Start a session, optionally scoped to a resort.
    ///
    /// The snapshot is synchronized before this returns.
    #[instrument(skip(self))]
    pub async fn start(&self, resort_id: Option<ResortId>) -> CoreResult<()> {
        self.request(|reply| ControllerCommand::Start { resort_id, reply })
            .await?
    }

    /// Pause the session. No-op unless recording.
    #[instrument(skip(self))]
    pub async fn pause(&self) -> CoreResult<()> {
        self.request(|reply| ControllerCommand::Pause { reply }).await
    }

    /// Resume the session. No-op unless paused.
    #[instrument(skip(self))]
    pub async fn resume(&self) -> CoreResult<()> {
        self.request(|reply| ControllerCommand::Resume { reply }).await
    }

    /// Stop the session and return its summary and record.
    ///
    /// Persistence runs on a detached task and is not awaited. Returns
    /// `None` when no session was open.
    #[instrument(skip(self))]
    pub async fn stop_and_summarize(&self) -> CoreResult<Option<StoppedSession>> {
        self.request(|reply| ControllerCommand::Stop { reply })
            .await?
    }

    /// Synchronize immediately, outside the poll timer.
    pub async fn refresh(&self) -> CoreResult<()> {
        self.request(|reply| ControllerCommand::Refresh { reply })
            .await
    }

    /// The application came back to the foreground.
    #[instrument(skip(self))]
    pub async fn notify_foreground(&self) -> CoreResult<()> {
        debug!("Foreground sync requested");
        self.refresh().await
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> LiveMetrics {
        *self.metrics_rx.borrow()
    }

    /// Observe snapshots as they are published.
    pub fn subscribe(&self) -> watch::Receiver<LiveMetrics> {
        self.metrics_rx.clone()
    }

    /// Stop the polling task and wait for it to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        if self.command_tx.send(ControllerCommand::Shutdown).await.is_err() {
            debug!("Polling task already gone");
        }

        if let Err(e) = self.worker.await {
            warn!(error = ?e, "Polling task panicked");
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> ControllerCommand,
    ) -> CoreResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| closed())?;

        reply_rx.await.map_err(|_| closed())
    }
}

#[track_caller]
fn closed() -> SessionError {
    SessionError::ControllerClosed {
        location: ErrorLocation::from(Location::caller()),
    }
}

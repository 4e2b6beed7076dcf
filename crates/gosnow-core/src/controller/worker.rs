use crate::{
    CoreResult,
    controller::{ControllerCommand, PollingCadence, StoppedSession},
    recorder::SessionRecorder,
    session::{LiveMetrics, RecordingState, ResortId, SessionSummary, SkiSession, Transition},
    store::SessionStore,
};

use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};
use tracing::{debug, error, info, instrument, warn};

/// The controller's single background task.
///
/// Sole writer of the metrics cell. Lifecycle commands are handled one at a
/// time between poll ticks, so every snapshot comes from exactly one
/// synchronization step.
pub(crate) struct ControllerWorker {
    pub(crate) recorder: Arc<dyn SessionRecorder>,
    pub(crate) store: Arc<dyn SessionStore>,
    pub(crate) max_sessions: usize,
    pub(crate) cadence: PollingCadence,
    pub(crate) metrics_tx: watch::Sender<LiveMetrics>,
    pub(crate) command_rx: mpsc::Receiver<ControllerCommand>,
}

impl ControllerWorker {
    /// Poll until shutdown is requested or every handle is dropped.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) {
        info!(
            active_ms = self.cadence.active.as_millis(),
            idle_ms = self.cadence.idle.as_millis(),
            "Recording controller polling started"
        );

        let mut last_sync = self.sync();

        loop {
            let next_tick = last_sync + self.cadence.interval_for(self.state());

            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(ControllerCommand::Shutdown) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Some(cmd) => {
                            if let Some(synced_at) = self.handle(cmd).await {
                                last_sync = synced_at;
                            }
                        }
                        None => {
                            info!("All controller handles dropped");
                            break;
                        }
                    }
                }

                _ = tokio::time::sleep_until(next_tick) => {
                    last_sync = self.sync();
                }
            }
        }

        info!("Recording controller polling stopped");
    }

    /// Returns when the command synchronized, if it did.
    async fn handle(&mut self, cmd: ControllerCommand) -> Option<Instant> {
        match cmd {
            ControllerCommand::Start { resort_id, reply } => {
                let (result, synced_at) = self.start(resort_id).await;
                let _ = reply.send(result);
                synced_at
            }
            ControllerCommand::Pause { reply } => {
                let synced_at = self.signal(Transition::Pause);
                let _ = reply.send(());
                synced_at
            }
            ControllerCommand::Resume { reply } => {
                let synced_at = self.signal(Transition::Resume);
                let _ = reply.send(());
                synced_at
            }
            ControllerCommand::Stop { reply } => {
                let (result, synced_at) = self.stop().await;
                let _ = reply.send(result);
                synced_at
            }
            ControllerCommand::Refresh { reply } => {
                let synced_at = self.sync();
                let _ = reply.send(());
                Some(synced_at)
            }
            // Handled by the run loop.
            ControllerCommand::Shutdown => None,
        }
    }

    async fn start(&mut self, resort_id: Option<ResortId>) -> (CoreResult<()>, Option<Instant>) {
        let state = self.state();

        if state.apply(Transition::Start).is_none() {
            debug!(%state, "Start ignored, session already open");
            return (Ok(()), None);
        }

        let result = self.recorder.start(resort_id).await;
        let synced_at = self.sync();

        match &result {
            Ok(()) => info!(?resort_id, state = %self.state(), "Session started"),
            Err(e) => error!(?resort_id, error = ?e, "Recorder failed to start"),
        }

        (result, Some(synced_at))
    }

    /// Pause or resume: signal the recorder, publish the new state
    /// optimistically, then re-synchronize.
    fn signal(&mut self, transition: Transition) -> Option<Instant> {
        let state = self.state();

        let Some(next) = state.apply(transition) else {
            debug!(%state, ?transition, "Transition ignored");
            return None;
        };

        match transition {
            Transition::Pause => self.recorder.pause(),
            Transition::Resume => self.recorder.resume(),
            Transition::Start | Transition::Stop => return None,
        }

        let optimistic = self.metrics_tx.borrow().with_state(next);
        self.metrics_tx.send_replace(optimistic);

        let synced_at = self.sync();
        info!(from = %state, to = %self.state(), "Session {}", label(transition));

        Some(synced_at)
    }

    async fn stop(&mut self) -> (CoreResult<Option<StoppedSession>>, Option<Instant>) {
        let state = self.state();

        if state.apply(Transition::Stop).is_none() {
            debug!(%state, "Stop ignored, no open session");
            return (Ok(None), None);
        }

        let session = match self.recorder.stop().await {
            Ok(session) => session,
            Err(e) => {
                error!(error = ?e, "Recorder failed to stop");
                let synced_at = self.sync();
                return (Err(e), Some(synced_at));
            }
        };

        let synced_at = self.sync();
        let summary = SessionSummary::from(&session);

        info!(
            session_id = %session.id,
            distance_km = summary.distance_km,
            duration_sec = summary.duration_sec,
            state = %self.state(),
            "Session stopped"
        );

        self.persist(session.clone());

        (Ok(Some(StoppedSession { summary, session })), Some(synced_at))
    }

    /// Hand the session to the store on a detached task.
    ///
    /// Failures are logged and dropped; the summary is already on its way
    /// back to the caller.
    fn persist(&self, session: SkiSession) {
        let store = Arc::clone(&self.store);
        let max_sessions = self.max_sessions;

        tokio::spawn(async move {
            if let Err(e) = store.save_session(&session).await {
                error!(session_id = %session.id, error = ?e, "Failed to save session");
                return;
            }

            match store.prune_to_limit(max_sessions).await {
                Ok(removed) => debug!(session_id = %session.id, removed, "Session persisted"),
                Err(e) => warn!(error = ?e, "Failed to prune session history"),
            }
        });
    }

    /// Copy the recorder's current values into the metrics cell in one step.
    fn sync(&self) -> Instant {
        let metrics = LiveMetrics::from(self.recorder.reading());
        self.metrics_tx.send_replace(metrics);
        Instant::now()
    }

    fn state(&self) -> RecordingState {
        self.metrics_tx.borrow().state
    }
}

fn label(transition: Transition) -> &'static str {
    match transition {
        Transition::Start => "started",
        Transition::Pause => "paused",
        Transition::Resume => "resumed",
        Transition::Stop => "stopped",
    }
}

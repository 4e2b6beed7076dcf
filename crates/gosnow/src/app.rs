use crate::{
    AppCommand, AppResult,
    report::{format_history_entry, format_metrics, format_summary},
};

use std::sync::Arc;

use gosnow_core::{LiveMetrics, RecordingController, ResortId, SessionStore};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument};

/// Main application state.
///
/// Owns the recording controller and turns console commands into
/// controller calls. Live snapshots are mirrored to the log as they are
/// published.
pub struct App {
    pub(crate) controller: RecordingController,
    pub(crate) store: Arc<dyn SessionStore>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("GoSnow recorder starting");

        let mut metrics_rx = self.controller.subscribe();
        let mut last_logged: Option<LiveMetrics> = None;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(AppCommand::Shutdown) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Some(cmd) => {
                            if let Err(e) = self.handle_command(cmd).await {
                                error!(?cmd, error = ?e, "Command failed");
                            }
                        }
                        None => {
                            info!("Command channel closed, shutting down");
                            break;
                        }
                    }
                }

                changed = metrics_rx.changed() => {
                    if changed.is_err() {
                        info!("Metrics channel closed");
                        break;
                    }

                    let metrics = *metrics_rx.borrow_and_update();
                    if last_logged != Some(metrics) {
                        debug!("{}", format_metrics(&metrics));
                        last_logged = Some(metrics);
                    }
                }
            }
        }

        self.controller.shutdown().await;

        let _ = self.shutdown_tx.send(true);
        info!("GoSnow recorder shut down successfully");

        Ok(())
    }

    async fn handle_command(&self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Start { resort_id } => self.start(resort_id).await?,
            AppCommand::Pause => {
                self.controller.pause().await?;
                info!("{}", format_metrics(&self.controller.snapshot()));
            }
            AppCommand::Resume => {
                self.controller.resume().await?;
                info!("{}", format_metrics(&self.controller.snapshot()));
            }
            AppCommand::Stop => self.stop().await?,
            AppCommand::Status => {
                info!("{}", format_metrics(&self.controller.snapshot()));
            }
            AppCommand::History => self.history().await?,
            AppCommand::Foreground => {
                self.controller.notify_foreground().await?;
                info!("{}", format_metrics(&self.controller.snapshot()));
            }
            // Handled by the run loop.
            AppCommand::Shutdown => {}
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn start(&self, resort_id: Option<ResortId>) -> AppResult<()> {
        self.controller.start(resort_id).await?;
        info!("{}", format_metrics(&self.controller.snapshot()));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop(&self) -> AppResult<()> {
        match self.controller.stop_and_summarize().await? {
            Some(stopped) => info!(
                session_id = %stopped.session.id,
                "Run finished: {}",
                format_summary(&stopped.summary)
            ),
            None => info!("No session to stop"),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn history(&self) -> AppResult<()> {
        let sessions = self.store.load_sessions().await?;

        if sessions.is_empty() {
            info!("No saved sessions");
            return Ok(());
        }

        info!(count = sessions.len(), "Saved sessions");
        for session in &sessions {
            info!("{}", format_history_entry(session));
        }

        Ok(())
    }
}

//! Line-oriented console front-end.
//!
//! Reads commands from stdin on a blocking task and forwards them to the
//! main application as [`AppCommand`]s.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Help line printed for unknown input.
pub(crate) const USAGE: &str =
    "commands: start [resort-id] | pause | resume | stop | status | history | foreground | quit";

/// Console command reader.
pub struct ConsoleHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl ConsoleHandler {
    /// Create a handler that forwards parsed commands to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the console loop until shutdown is signalled or stdin closes.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Shutdown: when line_rx is dropped, the next blocking_send() fails
        // and the forwarder exits. A forwarder parked in read_line() only
        // notices after the next line or EOF.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        info!("{}", USAGE);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console handler shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    match line {
                        Some(line) => self.handle_line(&line).await?,
                        None => {
                            info!("Console input closed");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                    }
                }
            }
        }

        drop(line_rx);

        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Console forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Console forwarder task panicked"),
            Err(_) => debug!(
                "Console forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    pub(crate) async fn handle_line(&self, line: &str) -> AppResult<()> {
        match parse_command(line) {
            Ok(Some(cmd)) => self.send(cmd).await,
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(error = %e, "{}", USAGE);
                Ok(())
            }
        }
    }

    async fn send(&self, cmd: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", cmd, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Parse one console line. Blank lines yield `None`.
#[track_caller]
pub(crate) fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let mut words = line.split_whitespace();

    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let invalid = |reason: &str| AppError::InvalidCommand {
        input: line.trim().to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let cmd = match verb.to_ascii_lowercase().as_str() {
        "start" => {
            let resort_id = match words.next() {
                Some(raw) => Some(
                    raw.parse()
                        .map_err(|_| invalid("resort id must be an integer"))?,
                ),
                None => None,
            };
            AppCommand::Start { resort_id }
        }
        "pause" => AppCommand::Pause,
        "resume" => AppCommand::Resume,
        "stop" => AppCommand::Stop,
        "status" => AppCommand::Status,
        "history" => AppCommand::History,
        "foreground" | "fg" => AppCommand::Foreground,
        "quit" | "exit" => AppCommand::Shutdown,
        _ => return Err(invalid("unknown command")),
    };

    if words.next().is_some() {
        return Err(invalid("unexpected trailing arguments"));
    }

    Ok(Some(cmd))
}

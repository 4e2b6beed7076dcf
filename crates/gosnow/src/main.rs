//! GoSnow: console ski run recorder with GPX replay.

mod app;
mod app_command;
mod config;
mod console_handler;
mod error;
mod report;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console_handler::ConsoleHandler,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::{path::PathBuf, sync::Arc, time::Duration};

use gosnow_core::{
    Fix, JsonSessionStore, RecordingController, SessionStore, TrackingRecorder, load_gpx, replay,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "gosnow=debug,gosnow_core=debug";
const LOG_FILE_PREFIX: &str = "gosnow.log";

/// Application entry point.
fn main() {
    // Dropping the guard flushes the file writer.
    let _log_guard = init_tracing();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    let data_dir = match config.data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve data directory: {:?}", e);
            std::process::exit(1);
        }
    };

    let fixes = match &config.replay.gpx_path {
        Some(path) => match load_gpx(path) {
            Ok(fixes) => Some(fixes),
            Err(e) => {
                error!("Failed to load GPX track: {:?}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(run(config, data_dir, fixes));

    // The stdin forwarder may still be parked in a read.
    rt.shutdown_timeout(Duration::from_secs(1));
}

async fn run(config: Config, data_dir: PathBuf, fixes: Option<Vec<Fix>>) {
    let recorder = Arc::new(TrackingRecorder::new());
    let store: Arc<dyn SessionStore> = Arc::new(JsonSessionStore::new(&data_dir));
    info!(data_dir = ?data_dir, "Session history location");

    let controller = RecordingController::new(
        recorder.clone(),
        Arc::clone(&store),
        config.controller_options(),
    );

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let replay_handle = fixes.map(|fixes| {
        info!(fixes = fixes.len(), speedup = config.replay.speedup, "Replaying GPX track");
        tokio::spawn(replay(
            fixes,
            Arc::clone(&recorder),
            config.replay.speedup,
            shutdown_rx.clone(),
        ))
    });

    let console_handler = ConsoleHandler::new(command_tx);

    let app = App {
        controller,
        store,
        command_rx,
        shutdown_tx,
    };

    tokio::join!(
        async {
            if let Err(e) = console_handler.run(shutdown_rx).await {
                error!(error = ?e, "Console handler error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    if let Some(handle) = replay_handle
        && let Err(e) = handle.await
    {
        warn!(error = ?e, "Replay task panicked");
    }
}

/// Console output plus a daily JSON log file under the platform data dir.
///
/// Falls back to console only when the log directory cannot be resolved.
fn init_tracing() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (file_layer, guard) = match Config::log_dir() {
        Ok(log_dir) => {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_writer(writer)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

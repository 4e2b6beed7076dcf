//! GoSnow core library
//!
//! Run recording for skiers: a polling controller that mirrors a GPS
//! recorder into an observable snapshot, drives the start/pause/resume/stop
//! lifecycle, and hands finished sessions to a local JSON history.
//!
//! # Example
//!
//! ```no_run
//! use gosnow_core::{
//!     ControllerOptions, CoreResult, JsonSessionStore, RecordingController, TrackingRecorder,
//! };
//!
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let recorder = Arc::new(TrackingRecorder::new());
//!     let store = Arc::new(JsonSessionStore::new("data"));
//!     let controller = RecordingController::new(recorder, store, ControllerOptions::default());
//!
//!     controller.start(Some(42)).await?;
//!     if let Some(stopped) = controller.stop_and_summarize().await? {
//!         println!("Skied {:.1} km", stopped.summary.distance_km);
//!     }
//!
//!     controller.shutdown().await;
//!     Ok(())
//! }
//! ```

mod controller;
mod error;
mod recorder;
mod session;
mod store;

pub use {
    controller::{
        ControllerOptions, DEFAULT_ACTIVE_INTERVAL, DEFAULT_IDLE_INTERVAL, PollingCadence,
        RecordingController, StoppedSession,
    },
    error::{Result as CoreResult, SessionError},
    recorder::{Fix, RecorderReading, SessionRecorder, TrackingRecorder, load_gpx, replay},
    session::{
        Coordinate, LiveMetrics, RecordingState, ResortId, SessionSummary, SkiSession, Transition,
    },
    store::{DEFAULT_MAX_SESSIONS, JsonSessionStore, SessionStore},
};

//! Recorder collaborator boundary and the GPS-fix driven implementation.

mod replay;
mod tracking;

pub use {
    replay::{load_gpx, replay},
    tracking::TrackingRecorder,
};

use crate::{
    CoreResult,
    session::{Coordinate, RecordingState, ResortId, SkiSession},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Current recorder values, read together in one call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecorderReading {
    /// Current speed in km/h.
    pub speed_kmh: f64,
    /// Distance covered this session in km.
    pub distance_km: f64,
    /// Active session time in seconds.
    pub duration_sec: u64,
    /// Recorder lifecycle state.
    pub state: RecordingState,
    /// Last known position.
    pub coordinate: Option<Coordinate>,
}

/// A single GPS sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    /// Reported position.
    pub coordinate: Coordinate,
    /// Altitude above sea level in metres.
    pub altitude_m: Option<f64>,
    /// Ground speed reported by the receiver in m/s.
    pub speed_mps: Option<f64>,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

/// The location-tracking collaborator driven by the recording controller.
///
/// `start` and `stop` may suspend. Everything else is a synchronous read
/// or signal. Failures are reported through [`CoreResult`] and passed
/// through to the controller's caller untouched.
#[async_trait]
pub trait SessionRecorder: Send + Sync {
    /// Begin tracking, optionally scoped to a resort.
    async fn start(&self, resort_id: Option<ResortId>) -> CoreResult<()>;

    /// Suspend accumulation.
    fn pause(&self);

    /// Continue accumulation after a pause.
    fn resume(&self);

    /// End the session and hand back its finalized record.
    async fn stop(&self) -> CoreResult<SkiSession>;

    /// One consistent read of all current values.
    fn reading(&self) -> RecorderReading;
}

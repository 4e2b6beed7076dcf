use crate::{
    CoreResult, SessionError,
    recorder::{Fix, RecorderReading, SessionRecorder},
    session::{Coordinate, RecordingState, ResortId, SkiSession},
};

use std::{
    panic::Location,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Segments implying a faster speed than this are GPS jumps, not skiing.
pub(crate) const MAX_PLAUSIBLE_SPEED_KMH: f64 = 200.0;

/// Movement below this between fixes sharing a timestamp is receiver noise.
const STATIONARY_DISTANCE_KM: f64 = 0.001;

const MPS_TO_KMH: f64 = 3.6;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Default)]
struct Track {
    state: RecordingState,
    session_id: Uuid,
    resort_id: Option<ResortId>,
    started_at: Option<DateTime<Utc>>,
    /// Start of the current un-paused stretch.
    active_since: Option<Instant>,
    /// Active time banked by earlier stretches.
    banked: Duration,
    speed_kmh: f64,
    top_speed_kmh: f64,
    distance_km: f64,
    elevation_drop_m: Option<f64>,
    coordinate: Option<Coordinate>,
    /// Previous fix of the current segment. Cleared on pause.
    last_fix: Option<Fix>,
    route: Vec<Coordinate>,
}

impl Track {
    fn active_duration(&self) -> Duration {
        self.banked + self.active_since.map(|t| t.elapsed()).unwrap_or_default()
    }

    fn ingest(&mut self, fix: Fix) {
        let segment_speed = match self.last_fix {
            Some(prev) => {
                let distance = prev.coordinate.distance_km(&fix.coordinate);
                let elapsed_ms = (fix.timestamp - prev.timestamp).num_milliseconds();
                let derived = (elapsed_ms > 0).then(|| distance / (elapsed_ms as f64 / MILLIS_PER_HOUR));

                // Without forward time any real movement implies unbounded speed.
                let jump = match derived {
                    Some(kmh) => kmh > MAX_PLAUSIBLE_SPEED_KMH,
                    None => distance > STATIONARY_DISTANCE_KM,
                };

                if jump {
                    warn!(
                        distance_km = distance,
                        elapsed_ms,
                        "Discarding implausible GPS jump"
                    );
                    self.last_fix = Some(fix);
                    self.coordinate = Some(fix.coordinate);
                    return;
                }

                self.distance_km += distance;

                if let (Some(before), Some(after)) = (prev.altitude_m, fix.altitude_m) {
                    let drop = self.elevation_drop_m.get_or_insert(0.0);
                    *drop += (before - after).max(0.0);
                }

                derived
            }
            None => None,
        };

        if fix.altitude_m.is_some() && self.elevation_drop_m.is_none() {
            self.elevation_drop_m = Some(0.0);
        }

        self.speed_kmh = fix
            .speed_mps
            .map(|mps| mps * MPS_TO_KMH)
            .or(segment_speed)
            .unwrap_or(0.0)
            .max(0.0);
        self.top_speed_kmh = self.top_speed_kmh.max(self.speed_kmh);
        self.coordinate = Some(fix.coordinate);
        self.route.push(fix.coordinate);
        self.last_fix = Some(fix);
    }
}

/// Recorder that accumulates session metrics from incoming GPS fixes.
///
/// Fixes arrive through [`TrackingRecorder::ingest`] from whatever feeds
/// positions (a receiver, a GPX replay). Position always follows the newest
/// fix; distance, speed and elevation only accumulate while recording.
/// Duration runs on the async runtime clock and excludes paused time.
#[derive(Debug, Default)]
pub struct TrackingRecorder {
    track: Mutex<Track>,
}

impl TrackingRecorder {
    /// Create an idle recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one GPS fix.
    pub fn ingest(&self, fix: Fix) {
        let mut track = self.lock();

        if track.state == RecordingState::Recording {
            track.ingest(fix);
        } else {
            track.coordinate = Some(fix.coordinate);
        }
    }

    // Poisoned locks are recovered; the track itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, Track> {
        self.track.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionRecorder for TrackingRecorder {
    #[instrument(skip(self))]
    async fn start(&self, resort_id: Option<ResortId>) -> CoreResult<()> {
        let mut track = self.lock();

        if track.state.is_active() {
            debug!(session_id = %track.session_id, "Recorder already tracking");
            return Ok(());
        }

        let coordinate = track.coordinate;
        *track = Track {
            state: RecordingState::Recording,
            session_id: Uuid::new_v4(),
            resort_id,
            started_at: Some(Utc::now()),
            active_since: Some(Instant::now()),
            coordinate,
            ..Track::default()
        };

        info!(session_id = %track.session_id, ?resort_id, "Tracking started");

        Ok(())
    }

    fn pause(&self) {
        let mut track = self.lock();

        if track.state != RecordingState::Recording {
            return;
        }

        if let Some(since) = track.active_since.take() {
            track.banked += since.elapsed();
        }
        track.state = RecordingState::Paused;
        track.speed_kmh = 0.0;
        track.last_fix = None;

        debug!(session_id = %track.session_id, "Tracking paused");
    }

    fn resume(&self) {
        let mut track = self.lock();

        if track.state != RecordingState::Paused {
            return;
        }

        track.active_since = Some(Instant::now());
        track.state = RecordingState::Recording;

        debug!(session_id = %track.session_id, "Tracking resumed");
    }

    #[instrument(skip(self))]
    async fn stop(&self) -> CoreResult<SkiSession> {
        let mut track = self.lock();

        if !track.state.is_active() {
            return Err(SessionError::RecorderFailed {
                reason: "No active session to stop".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let duration = track.active_duration();
        let hours = duration.as_secs_f64() / 3_600.0;
        let avg_speed_kmh = if hours > 0.0 {
            track.distance_km / hours
        } else {
            0.0
        };
        let end_at = Utc::now();

        let session = SkiSession {
            id: track.session_id,
            resort_id: track.resort_id,
            start_at: track.started_at.unwrap_or(end_at),
            end_at,
            duration_sec: duration.as_secs(),
            distance_km: track.distance_km,
            avg_speed_kmh,
            top_speed_kmh: track.top_speed_kmh,
            elevation_drop_m: track.elevation_drop_m,
            route: std::mem::take(&mut track.route),
        };

        // Final figures stay readable until the next start.
        track.banked = duration;
        track.active_since = None;
        track.speed_kmh = 0.0;
        track.last_fix = None;
        track.state = RecordingState::Idle;

        info!(
            session_id = %session.id,
            distance_km = session.distance_km,
            duration_sec = session.duration_sec,
            "Tracking stopped"
        );

        Ok(session)
    }

    fn reading(&self) -> RecorderReading {
        let track = self.lock();

        RecorderReading {
            speed_kmh: track.speed_kmh,
            distance_km: track.distance_km,
            duration_sec: track.active_duration().as_secs(),
            state: track.state,
            coordinate: track.coordinate,
        }
    }
}

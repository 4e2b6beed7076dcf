use crate::{
    recorder::RecorderReading,
    session::{Coordinate, RecordingState},
};

/// Snapshot of live session metrics exposed to observers.
///
/// Always produced whole from a single [`RecorderReading`], so speed,
/// distance, duration and position come from the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiveMetrics {
    /// Current speed in km/h.
    pub speed_kmh: f64,
    /// Distance covered this session in km.
    pub distance_km: f64,
    /// Active (non-paused) session time in seconds.
    pub duration_sec: u64,
    /// Lifecycle state as observers should see it.
    pub state: RecordingState,
    /// Last known position, if any fix was received.
    pub current_coordinate: Option<Coordinate>,
}

impl LiveMetrics {
    /// Same metrics with a different lifecycle state.
    ///
    /// Used for optimistic updates ahead of the next synchronization.
    pub fn with_state(self, state: RecordingState) -> Self {
        Self { state, ..self }
    }
}

impl From<RecorderReading> for LiveMetrics {
    fn from(reading: RecorderReading) -> Self {
        Self {
            speed_kmh: non_negative(reading.speed_kmh),
            distance_km: non_negative(reading.distance_km),
            duration_sec: reading.duration_sec,
            state: reading.state.settled(),
            current_coordinate: reading.coordinate,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

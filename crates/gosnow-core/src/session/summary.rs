use crate::session::SkiSession;

use serde::{Deserialize, Serialize};

/// Figures shown to the skier once a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Total distance in km.
    pub distance_km: f64,
    /// Average speed over active time in km/h.
    pub avg_speed_kmh: f64,
    /// Highest speed reached in km/h.
    pub top_speed_kmh: f64,
    /// Cumulative vertical descent in metres, when altitude was available.
    pub elevation_drop_m: Option<f64>,
    /// Active session time in seconds.
    pub duration_sec: u64,
}

impl From<&SkiSession> for SessionSummary {
    fn from(session: &SkiSession) -> Self {
        Self {
            distance_km: session.distance_km,
            avg_speed_kmh: session.avg_speed_kmh,
            top_speed_kmh: session.top_speed_kmh,
            elevation_drop_m: session.elevation_drop_m,
            duration_sec: session.duration_sec,
        }
    }
}

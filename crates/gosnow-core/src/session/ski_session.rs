use crate::session::Coordinate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a ski resort, used to scope a session.
pub type ResortId = i64;

/// Persisted record of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkiSession {
    /// Unique session id.
    pub id: Uuid,
    /// Resort the session was scoped to.
    #[serde(default)]
    pub resort_id: Option<ResortId>,
    /// When recording started.
    pub start_at: DateTime<Utc>,
    /// When recording stopped.
    pub end_at: DateTime<Utc>,
    /// Active session time in seconds.
    pub duration_sec: u64,
    /// Total distance in km.
    pub distance_km: f64,
    /// Average speed over active time in km/h.
    pub avg_speed_kmh: f64,
    /// Highest speed reached in km/h.
    pub top_speed_kmh: f64,
    /// Cumulative vertical descent in metres.
    #[serde(default)]
    pub elevation_drop_m: Option<f64>,
    /// Recorded positions in order.
    #[serde(default)]
    pub route: Vec<Coordinate>,
}

use crate::{
    CoreResult, SessionError,
    recorder::{Fix, TrackingRecorder},
    session::Coordinate,
};

use std::{fs::File, io::BufReader, panic::Location, path::Path, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Spacing assumed for track points that carry no timestamp, in seconds.
const UNTIMED_POINT_SPACING_SECS: i64 = 1;

/// Longest real-time wait between two replayed fixes.
const MAX_REPLAY_GAP: Duration = Duration::from_secs(10);

/// Load every track point of a GPX file as a sequence of fixes.
#[track_caller]
#[instrument(skip(path), fields(path = ?path.as_ref()))]
pub fn load_gpx<P: AsRef<Path>>(path: P) -> CoreResult<Vec<Fix>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| SessionError::ReplayFailed {
        reason: format!("Failed to open {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let gpx = gpx::read(BufReader::new(file)).map_err(|e| SessionError::ReplayFailed {
        reason: format!("Failed to parse {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut fixes: Vec<Fix> = Vec::new();

    for track in gpx.tracks {
        for segment in track.segments {
            for point in segment.points {
                let timestamp = point
                    .time
                    .and_then(|t| t.format().ok())
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_else(|| match fixes.last() {
                        Some(prev) => prev.timestamp + TimeDelta::seconds(UNTIMED_POINT_SPACING_SECS),
                        None => Utc::now(),
                    });

                let position = point.point();

                fixes.push(Fix {
                    coordinate: Coordinate::new(position.y(), position.x()),
                    altitude_m: point.elevation,
                    speed_mps: None,
                    timestamp,
                });
            }
        }
    }

    if fixes.is_empty() {
        return Err(SessionError::ReplayFailed {
            reason: format!("No track points in {:?}", path),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    info!(fix_count = fixes.len(), "GPX track loaded");

    Ok(fixes)
}

/// Feed `fixes` into `recorder`, keeping their original spacing divided by
/// `speedup`.
///
/// Runs until the fixes are exhausted or `shutdown_rx` flips. Returns the
/// number of fixes delivered.
#[instrument(skip(fixes, recorder, shutdown_rx), fields(fix_count = fixes.len()))]
pub async fn replay(
    fixes: Vec<Fix>,
    recorder: Arc<TrackingRecorder>,
    speedup: f64,
    mut shutdown_rx: watch::Receiver<bool>,
) -> usize {
    let speedup = if speedup.is_finite() && speedup >= 1.0 {
        speedup
    } else {
        1.0
    };

    let mut delivered = 0;
    let mut previous: Option<DateTime<Utc>> = None;

    for fix in fixes {
        if let Some(prev) = previous {
            let gap = (fix.timestamp - prev)
                .to_std()
                .unwrap_or_default()
                .min(MAX_REPLAY_GAP)
                .div_f64(speedup);

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!(delivered, "Replay cancelled");
                    return delivered;
                }
                _ = tokio::time::sleep(gap) => {}
            }
        }

        recorder.ingest(fix);
        previous = Some(fix.timestamp);
        delivered += 1;
    }

    info!(delivered, "Replay finished");

    delivered
}

//! Console rendering of live metrics and finished sessions.

use gosnow_core::{LiveMetrics, SessionSummary, SkiSession};

/// Render seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub(crate) fn format_duration(duration_sec: u64) -> String {
    let hours = duration_sec / 3_600;
    let minutes = (duration_sec % 3_600) / 60;
    let seconds = duration_sec % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub(crate) fn format_metrics(metrics: &LiveMetrics) -> String {
    let position = match metrics.current_coordinate {
        Some(c) => format!("{:.5}, {:.5}", c.latitude, c.longitude),
        None => "no fix".to_string(),
    };

    format!(
        "[{}] {:.1} km/h | {:.2} km | {} | {}",
        metrics.state,
        metrics.speed_kmh,
        metrics.distance_km,
        format_duration(metrics.duration_sec),
        position
    )
}

pub(crate) fn format_summary(summary: &SessionSummary) -> String {
    let drop = match summary.elevation_drop_m {
        Some(m) => format!("{:.0} m", m),
        None => "n/a".to_string(),
    };

    format!(
        "distance {:.2} km | avg {:.1} km/h | top {:.1} km/h | drop {} | time {}",
        summary.distance_km,
        summary.avg_speed_kmh,
        summary.top_speed_kmh,
        drop,
        format_duration(summary.duration_sec)
    )
}

/// One history line: end time, resort and the session's summary.
pub(crate) fn format_history_entry(session: &SkiSession) -> String {
    let resort = match session.resort_id {
        Some(id) => format!("resort {}", id),
        None => "no resort".to_string(),
    };

    format!(
        "{} | {} | {}",
        session.end_at.format("%Y-%m-%d %H:%M"),
        resort,
        format_summary(&SessionSummary::from(session))
    )
}

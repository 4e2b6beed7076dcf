mod coordinate;
mod metrics;
mod ski_session;
mod state;
mod summary;

pub use {
    coordinate::Coordinate,
    metrics::LiveMetrics,
    ski_session::{ResortId, SkiSession},
    state::{RecordingState, Transition},
    summary::SessionSummary,
};

use gosnow_core::ResortId;

/// Commands sent from the console handler to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Begin a recording session.
    Start {
        /// Resort the run is scoped to, if any.
        resort_id: Option<ResortId>,
    },
    /// Pause the running session.
    Pause,
    /// Resume a paused session.
    Resume,
    /// Stop the session and print its summary.
    Stop,
    /// Print the current live metrics.
    Status,
    /// Print the saved session history.
    History,
    /// The front-end came back to the foreground.
    Foreground,
    /// Request application shutdown.
    Shutdown,
}

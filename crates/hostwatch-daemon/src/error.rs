//! Daemon-related errors.

use hostwatch_monitor::MonitorError;
use thiserror::Error;

/// Errors that can occur while running the daemon.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Failed to set up signal handlers.
    #[error("Failed to set up signal handlers: {0}")]
    SignalSetup(String),

    /// A health cycle failed as a whole.
    #[error(transparent)]
    Cycle(#[from] MonitorError),
}

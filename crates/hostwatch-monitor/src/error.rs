//! Monitor errors.

use std::any::Any;
use std::path::PathBuf;

use thiserror::Error;

/// Monitor error types.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A metrics, service-manager or container-runtime query failed.
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// A notification channel could not deliver.
    #[error("Delivery via {channel} failed: {reason}")]
    Transport { channel: String, reason: String },

    /// A log artifact could not be removed.
    #[error("Failed to remove {}: {reason}", path.display())]
    Housekeeping { path: PathBuf, reason: String },

    /// Anything else that escaped a check or a cycle.
    #[error("Unexpected fault: {0}")]
    UnexpectedCycleFault(String),
}

impl MonitorError {
    pub(crate) fn transport(channel: &str, reason: impl std::fmt::Display) -> Self {
        MonitorError::Transport {
            channel: channel.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

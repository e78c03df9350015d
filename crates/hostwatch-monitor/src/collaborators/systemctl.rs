//! systemd service state through `systemctl is-active`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::ServiceManager;
use crate::error::MonitorError;

/// Queries systemd with `systemctl is-active --quiet <unit>`.
pub struct Systemctl {
    program: String,
}

impl Systemctl {
    pub fn new() -> Self {
        Self::with_program("systemctl")
    }

    /// Use a different executable, e.g. a wrapper script.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceManager for Systemctl {
    async fn is_active(&self, service: &str) -> Result<bool, MonitorError> {
        let status = Command::new(&self.program)
            .args(["is-active", "--quiet", service])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                MonitorError::CollaboratorUnavailable(format!(
                    "Failed to execute {}: {}",
                    self.program, e
                ))
            })?;

        debug!("{} is-active {}: {}", self.program, service, status);
        Ok(status.success())
    }
}

//! Container state through `docker inspect`.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::{ContainerInfo, ContainerRuntime};
use crate::error::MonitorError;

/// Subset of `docker inspect` output we rely on.
#[derive(Debug, Deserialize)]
struct InspectRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "State")]
    state: InspectState,
}

#[derive(Debug, Deserialize)]
struct InspectState {
    #[serde(rename = "Status")]
    status: String,
}

/// Resolves containers with `docker inspect --type container <name>`.
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self::with_program("docker")
    }

    /// Use a different executable, e.g. `podman`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn get(&self, name: &str) -> Result<Option<ContainerInfo>, MonitorError> {
        let output = Command::new(&self.program)
            .args(["inspect", "--type", "container", name])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                MonitorError::CollaboratorUnavailable(format!(
                    "Failed to execute {}: {}",
                    self.program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(None);
            }
            return Err(MonitorError::CollaboratorUnavailable(format!(
                "{} inspect {} failed: {}",
                self.program,
                name,
                stderr.trim()
            )));
        }

        parse_inspect(&output.stdout)
    }
}

fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such container") || lower.contains("no such object")
}

fn parse_inspect(stdout: &[u8]) -> Result<Option<ContainerInfo>, MonitorError> {
    let records: Vec<InspectRecord> = serde_json::from_slice(stdout).map_err(|e| {
        MonitorError::CollaboratorUnavailable(format!("unreadable inspect output: {}", e))
    })?;

    Ok(records.into_iter().next().map(|r| ContainerInfo {
        id: r.id,
        name: r.name.trim_start_matches('/').to_string(),
        status: r.state.status,
    }))
}

//! Collaborators the checks query: host metrics, the service manager and the
//! container runtime.
//!
//! Each collaborator is a trait so checks can run against live adapters in
//! production and fakes in tests.

mod docker;
mod system;
mod systemctl;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MonitorError;

pub use docker::DockerCli;
pub use system::SystemMetrics;
pub use systemctl::Systemctl;

/// Host resource metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// CPU usage in percent, averaged over a short sampling window.
    async fn cpu_percent(&self) -> Result<f64, MonitorError>;

    /// Memory usage in percent.
    async fn memory_percent(&self) -> Result<f64, MonitorError>;

    /// Usage in percent of the filesystem holding `path`.
    async fn disk_percent(&self, path: &Path) -> Result<f64, MonitorError>;

    /// Bytes sent plus received on all interfaces since boot.
    async fn network_bytes_total(&self) -> Result<u64, MonitorError>;
}

/// OS service manager.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Whether the named service is active. A non-zero exit means inactive.
    async fn is_active(&self, service: &str) -> Result<bool, MonitorError>;
}

/// Container runtime.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Look a container up by name. `Ok(None)` when it does not exist.
    async fn get(&self, name: &str) -> Result<Option<ContainerInfo>, MonitorError>;
}

/// Container state as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl ContainerInfo {
    /// First 12 characters of the id, as shown by `docker ps`.
    pub fn short_id(&self) -> &str {
        self.id.get(..12).unwrap_or(&self.id)
    }

    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("running")
    }
}

/// The set of collaborator handles a health cycle runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub metrics: Arc<dyn MetricsSource>,
    pub services: Arc<dyn ServiceManager>,
    pub containers: Arc<dyn ContainerRuntime>,
}

impl Collaborators {
    /// Live adapters: sysinfo, `systemctl` and the `docker` CLI.
    pub fn live() -> Self {
        Self {
            metrics: Arc::new(SystemMetrics::new()),
            services: Arc::new(Systemctl::new()),
            containers: Arc::new(DockerCli::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str, status: &str) -> ContainerInfo {
        ContainerInfo {
            id: id.to_string(),
            name: "db".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_short_id() {
        let info = container("4f1c2d3e4b5a6978a1b2c3d4e5f6", "running");
        assert_eq!(info.short_id(), "4f1c2d3e4b5a");
    }

    #[test]
    fn test_short_id_shorter_than_prefix() {
        let info = container("abc", "running");
        assert_eq!(info.short_id(), "abc");
    }

    #[test]
    fn test_is_running() {
        assert!(container("a", "running").is_running());
        assert!(!container("a", "exited").is_running());
        assert!(!container("a", "restarting").is_running());
    }
}

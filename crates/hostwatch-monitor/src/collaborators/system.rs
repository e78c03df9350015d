//! Host metrics via `sysinfo`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sysinfo::{Disks, Networks, System};

use super::MetricsSource;
use crate::error::MonitorError;

/// Window over which CPU usage is averaged.
const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Metrics read from the local host.
pub struct SystemMetrics {
    system: Mutex<System>,
}

impl SystemMetrics {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSource for SystemMetrics {
    async fn cpu_percent(&self) -> Result<f64, MonitorError> {
        // Two refreshes one window apart; the second yields the average.
        self.system.lock().refresh_cpu_usage();
        tokio::time::sleep(CPU_SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;
        let mut system = self.system.lock();
        system.refresh_cpu_usage();
        Ok(f64::from(system.global_cpu_usage()))
    }

    async fn memory_percent(&self) -> Result<f64, MonitorError> {
        let mut system = self.system.lock();
        system.refresh_memory();
        used_percent(system.total_memory(), system.available_memory()).ok_or_else(|| {
            MonitorError::CollaboratorUnavailable("total memory reported as 0".to_string())
        })
    }

    async fn disk_percent(&self, path: &Path) -> Result<f64, MonitorError> {
        let disks = Disks::new_with_refreshed_list();
        let mounts: Vec<Mount> = disks
            .iter()
            .map(|d| Mount {
                mount_point: d.mount_point().to_path_buf(),
                total: d.total_space(),
                available: d.available_space(),
            })
            .collect();

        let mount = mount_for(path, &mounts).ok_or_else(|| {
            MonitorError::CollaboratorUnavailable(format!(
                "no mounted filesystem holds {}",
                path.display()
            ))
        })?;

        used_percent(mount.total, mount.available).ok_or_else(|| {
            MonitorError::CollaboratorUnavailable(format!(
                "filesystem at {} reports 0 bytes",
                mount.mount_point.display()
            ))
        })
    }

    async fn network_bytes_total(&self) -> Result<u64, MonitorError> {
        let networks = Networks::new_with_refreshed_list();
        Ok(networks
            .values()
            .map(|data| data.total_received().saturating_add(data.total_transmitted()))
            .fold(0_u64, u64::saturating_add))
    }
}

#[derive(Debug, Clone)]
struct Mount {
    mount_point: PathBuf,
    total: u64,
    available: u64,
}

/// Percentage of `total` in use, `None` when `total` is 0.
fn used_percent(total: u64, available: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(used as f64 / total as f64 * 100.0)
}

/// The mount with the longest mount point that is a prefix of `path`.
fn mount_for<'a>(path: &Path, mounts: &'a [Mount]) -> Option<&'a Mount> {
    mounts
        .iter()
        .filter(|m| path.starts_with(&m.mount_point))
        .max_by_key(|m| m.mount_point.components().count())
}

//! Resource threshold checks.

use async_trait::async_trait;

use super::{CheckContext, HealthCheck};
use crate::error::MonitorError;
use crate::finding::{CheckResult, Finding};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Sampled host resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Cpu,
    Memory,
    Disk,
    Network,
}

impl Resource {
    pub fn id(&self) -> &'static str {
        match self {
            Resource::Cpu => "cpu",
            Resource::Memory => "memory",
            Resource::Disk => "disk",
            Resource::Network => "network",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            Resource::Cpu => "CPU Alert",
            Resource::Memory => "Memory Alert",
            Resource::Disk => "Disk Alert",
            Resource::Network => "Network Alert",
        }
    }
}

/// Compares one sampled value against its threshold.
pub struct ResourceCheck {
    resource: Resource,
}

impl ResourceCheck {
    pub fn new(resource: Resource) -> Self {
        Self { resource }
    }
}

#[async_trait]
impl HealthCheck for ResourceCheck {
    fn id(&self) -> &'static str {
        self.resource.id()
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError> {
        let thresholds = &ctx.config.thresholds;
        let metrics = &ctx.collaborators.metrics;

        let finding = match self.resource {
            Resource::Cpu => {
                evaluate_percent(Resource::Cpu, metrics.cpu_percent().await?, thresholds.cpu)
            }
            Resource::Memory => evaluate_percent(
                Resource::Memory,
                metrics.memory_percent().await?,
                thresholds.memory,
            ),
            Resource::Disk => evaluate_percent(
                Resource::Disk,
                metrics.disk_percent(&ctx.config.disk_path).await?,
                thresholds.disk,
            ),
            Resource::Network => {
                evaluate_network(metrics.network_bytes_total().await?, thresholds.network)
            }
        };

        Ok(finding.into_iter().collect())
    }
}

/// Alert iff `value > threshold`.
pub(crate) fn evaluate_percent(resource: Resource, value: f64, threshold: f64) -> Option<Finding> {
    if value.is_nan() || value <= threshold {
        return None;
    }

    let message = match resource {
        Resource::Cpu => format!("High CPU usage detected: {:.1}%", value),
        Resource::Memory => format!("High memory usage detected: {:.1}%", value),
        Resource::Disk => format!("Low disk space detected: {:.1}% used", value),
        Resource::Network => format!("High network usage detected: {:.1}%", value),
    };
    Some(Finding::alert(resource.id(), resource.subject(), message))
}

/// Alert iff `bytes > threshold`; the message shows megabytes since boot.
pub(crate) fn evaluate_network(bytes: u64, threshold: u64) -> Option<Finding> {
    if bytes <= threshold {
        return None;
    }

    let megabytes = bytes as f64 / BYTES_PER_MB;
    Some(Finding::alert(
        Resource::Network.id(),
        Resource::Network.subject(),
        format!("High network traffic detected: {:.2} MB", megabytes),
    ))
}

//! Docker container availability check.

use async_trait::async_trait;
use tracing::warn;

use super::{CheckContext, HealthCheck};
use crate::error::MonitorError;
use crate::finding::{CheckResult, Finding};

/// Emits exactly one finding per watched container. A lookup fault for one
/// name does not stop the others from being checked.
pub struct ContainerCheck;

#[async_trait]
impl HealthCheck for ContainerCheck {
    fn id(&self) -> &'static str {
        "containers"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError> {
        let mut findings = Vec::with_capacity(ctx.config.docker_containers.len());

        for name in &ctx.config.docker_containers {
            let subject = format!("Docker Container Alert: {}", name);
            let finding = match ctx.collaborators.containers.get(name).await {
                Ok(Some(container)) if container.is_running() => Finding::info(
                    self.id(),
                    format!("Docker container {} is running.", container.name),
                ),
                Ok(Some(container)) => Finding::alert(
                    self.id(),
                    subject,
                    format!(
                        "ALERT: Docker container {} ({}) is not running (status: {})!",
                        container.name,
                        container.short_id(),
                        container.status
                    ),
                ),
                Ok(None) => Finding::alert(
                    self.id(),
                    subject,
                    format!("ALERT: Docker container {} was not found!", name),
                ),
                Err(e) => {
                    warn!("Could not inspect container {}: {}", name, e);
                    Finding::alert(
                        self.id(),
                        subject,
                        format!("Error checking Docker container {}: {}", name, e),
                    )
                }
            };
            findings.push(finding);
        }

        Ok(findings)
    }
}

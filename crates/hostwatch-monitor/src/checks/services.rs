//! systemd service availability check.

use async_trait::async_trait;
use tracing::warn;

use super::{CheckContext, HealthCheck};
use crate::error::MonitorError;
use crate::finding::{CheckResult, Finding};

/// Emits exactly one finding per watched service.
pub struct ServiceCheck;

#[async_trait]
impl HealthCheck for ServiceCheck {
    fn id(&self) -> &'static str {
        "services"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError> {
        let mut findings = Vec::with_capacity(ctx.config.services.len());

        for service in &ctx.config.services {
            let subject = format!("Service Alert: {}", service);
            let finding = match ctx.collaborators.services.is_active(service).await {
                Ok(true) => Finding::info(self.id(), format!("Service {} is active.", service)),
                Ok(false) => Finding::alert(
                    self.id(),
                    subject,
                    format!("ALERT: Service {} is not active!", service),
                ),
                Err(e) => {
                    warn!("Could not query service {}: {}", service, e);
                    Finding::alert(
                        self.id(),
                        subject,
                        format!("ALERT: Could not determine whether service {} is active: {}", service, e),
                    )
                }
            };
            findings.push(finding);
        }

        Ok(findings)
    }
}

//! Health check registry.
//!
//! Checks run one after another in a fixed order: resource checks first
//! (CPU, memory, disk, network), then availability checks (services,
//! containers). A failing or panicking check becomes an alert finding and
//! the remaining checks still run.

mod containers;
mod resources;
mod services;

#[cfg(test)]
#[path = "checks_tests.rs"]
mod tests;

use async_trait::async_trait;
use futures::FutureExt;
use hostwatch_config::Config;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

use crate::collaborators::Collaborators;
use crate::error::{panic_message, MonitorError};
use crate::finding::{CheckResult, Finding};

pub use containers::ContainerCheck;
pub use resources::{Resource, ResourceCheck};
pub use services::ServiceCheck;

/// What a check reads from: the config snapshot and the collaborators.
pub struct CheckContext<'a> {
    pub config: &'a Config,
    pub collaborators: &'a Collaborators,
}

/// One independent health check.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Stable identifier, used as the finding source.
    fn id(&self) -> &'static str;

    /// Run the check once.
    async fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError>;
}

/// Ordered set of health checks.
pub struct CheckRegistry {
    checks: Vec<Box<dyn HealthCheck>>,
}

impl CheckRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// The standard check order.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ResourceCheck::new(Resource::Cpu)));
        registry.register(Box::new(ResourceCheck::new(Resource::Memory)));
        registry.register(Box::new(ResourceCheck::new(Resource::Disk)));
        registry.register(Box::new(ResourceCheck::new(Resource::Network)));
        registry.register(Box::new(ServiceCheck));
        registry.register(Box::new(ContainerCheck));
        registry
    }

    /// Append a check.
    pub fn register(&mut self, check: Box<dyn HealthCheck>) {
        self.checks.push(check);
    }

    /// Check ids in run order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.id()).collect()
    }

    /// Checks in run order.
    pub fn checks(&self) -> impl Iterator<Item = &dyn HealthCheck> {
        self.checks.iter().map(|c| c.as_ref())
    }

    /// Run a single check, turning an error or a panic into an alert.
    pub async fn run_check(&self, check: &dyn HealthCheck, ctx: &CheckContext<'_>) -> CheckResult {
        let outcome = AssertUnwindSafe(check.run(ctx)).catch_unwind().await;

        match outcome {
            Ok(Ok(findings)) => {
                debug!("Check {} produced {} finding(s)", check.id(), findings.len());
                findings
            }
            Ok(Err(e)) => {
                error!("Check {} failed: {}", check.id(), e);
                vec![failure_finding(check.id(), &e.to_string())]
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                error!("Check {} panicked: {}", check.id(), message);
                vec![failure_finding(check.id(), &message)]
            }
        }
    }

    /// Run every check in order and collect all findings.
    pub async fn run_all(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for check in self.checks() {
            findings.extend(self.run_check(check, ctx).await);
        }
        findings
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn failure_finding(check_id: &str, reason: &str) -> Finding {
    Finding::alert(
        check_id,
        format!("Check Failure: {}", check_id),
        format!("Error while running the {} check: {}", check_id, reason),
    )
}

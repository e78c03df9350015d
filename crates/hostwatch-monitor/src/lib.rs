//! # hostwatch Monitor
//!
//! Health checks and alert routing for a single host.
//!
//! ## Features
//!
//! - Resource threshold checks (CPU, memory, disk, network)
//! - systemd service and Docker container availability checks
//! - Notification fan-out to log, webhook and email channels
//! - Retention sweep of the daily log files

pub mod channels;
pub mod checks;
pub mod collaborators;
pub mod cycle;
pub mod dispatcher;
pub mod error;
pub mod finding;
pub mod retention;
pub mod transports;

#[cfg(test)]
pub(crate) mod testing;

pub use channels::{ChannelKind, LogChannel, NotificationChannel};
pub use checks::{CheckContext, CheckRegistry, HealthCheck};
pub use collaborators::{
    Collaborators, ContainerInfo, ContainerRuntime, MetricsSource, ServiceManager,
};
pub use cycle::{CycleSummary, HealthCycle};
pub use dispatcher::Dispatcher;
pub use error::MonitorError;
pub use finding::{CheckResult, Finding, Severity};
pub use retention::{RetentionSweeper, SweepReport};
pub use transports::{EmailChannel, WebhookChannel};

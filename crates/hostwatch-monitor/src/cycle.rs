//! One full health pass over the host.

use std::sync::Arc;

use hostwatch_config::Config;
use tracing::{debug, info, warn};

use crate::checks::{CheckContext, CheckRegistry};
use crate::collaborators::Collaborators;
use crate::dispatcher::Dispatcher;
use crate::retention::RetentionSweeper;

const SOURCE: &str = "cycle";

/// Counts from one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub findings: usize,
    pub alerts: usize,
    pub swept: usize,
}

/// Runs the retention sweep, then every registered check, dispatching each
/// finding as soon as its check returns.
pub struct HealthCycle {
    config: Arc<Config>,
    collaborators: Collaborators,
    registry: CheckRegistry,
    dispatcher: Arc<Dispatcher>,
    sweeper: RetentionSweeper,
}

impl HealthCycle {
    /// Create a cycle over the standard checks.
    pub fn new(config: Arc<Config>, collaborators: Collaborators, dispatcher: Arc<Dispatcher>) -> Self {
        let sweeper = RetentionSweeper::from_config(&config);
        Self {
            config,
            collaborators,
            registry: CheckRegistry::standard(),
            dispatcher,
            sweeper,
        }
    }

    /// Replace the check registry.
    pub fn with_registry(mut self, registry: CheckRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one pass. Faults inside checks and channels are contained below
    /// this level, so a cycle always completes.
    pub async fn run(&self) -> CycleSummary {
        let mut summary = CycleSummary {
            swept: self.sweep().await,
            ..Default::default()
        };

        self.dispatcher.info(SOURCE, "Running system checks...").await;

        let ctx = CheckContext {
            config: &self.config,
            collaborators: &self.collaborators,
        };
        for check in self.registry.checks() {
            let findings = self.registry.run_check(check, &ctx).await;
            for finding in &findings {
                self.dispatcher.dispatch(finding).await;
            }
            summary.alerts += findings.iter().filter(|f| f.is_alert()).count();
            summary.findings += findings.len();
        }

        self.dispatcher.info(SOURCE, "System checks completed.").await;

        if summary.alerts > 0 {
            info!(
                "Cycle finished with {} alert(s) out of {} finding(s)",
                summary.alerts, summary.findings
            );
        } else {
            debug!("Cycle finished: {} finding(s), no alerts", summary.findings);
        }

        summary
    }

    /// Retention sweep on the blocking pool; returns the number of files removed.
    async fn sweep(&self) -> usize {
        let sweeper = self.sweeper.clone();
        match tokio::task::spawn_blocking(move || sweeper.sweep()).await {
            Ok(report) => report.removed.len(),
            Err(e) => {
                warn!("Log retention sweep did not finish: {}", e);
                0
            }
        }
    }
}

//! Findings produced by checks and consumed by the dispatcher.

use chrono::{DateTime, Utc};

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine status, e.g. "service is active".
    Info,
    /// Something an operator should look at.
    Alert,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Alert => write!(f, "ALERT"),
        }
    }
}

/// A single observation worth reporting.
///
/// Alerts always carry a subject, info findings never do. The email channel
/// only receives findings with a subject.
#[derive(Debug, Clone)]
pub struct Finding {
    /// Id of the check (or component) that produced it.
    pub source: String,
    pub severity: Severity,
    pub message: String,
    pub subject: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Findings produced by one invocation of one check, in order.
pub type CheckResult = Vec<Finding>;

impl Finding {
    /// Create an informational finding.
    pub fn info(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            severity: Severity::Info,
            message: message.into(),
            subject: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an alert finding.
    pub fn alert(
        source: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            severity: Severity::Alert,
            message: message.into(),
            subject: Some(subject.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_alert(&self) -> bool {
        self.severity == Severity::Alert
    }

    /// Creation time in UTC, to the second.
    pub fn observed_at(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

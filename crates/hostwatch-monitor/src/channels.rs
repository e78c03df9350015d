//! Notification channel trait and the log channel.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::MonitorError;
use crate::finding::{Finding, Severity};

/// Channel variant, used by the dispatcher's routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Log,
    Webhook,
    Email,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Log => write!(f, "log"),
            ChannelKind::Webhook => write!(f, "webhook"),
            ChannelKind::Email => write!(f, "email"),
        }
    }
}

/// Notification channel trait.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel name.
    fn name(&self) -> &str;

    /// Channel variant.
    fn kind(&self) -> ChannelKind;

    /// Deliver a finding.
    async fn send(&self, finding: &Finding) -> Result<(), MonitorError>;
}

/// Log channel (writes to tracing).
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Log
    }

    async fn send(&self, finding: &Finding) -> Result<(), MonitorError> {
        match finding.severity {
            Severity::Info => info!(
                source = %finding.source,
                observed_at = %finding.observed_at(),
                "{}",
                finding.message
            ),
            Severity::Alert => warn!(
                source = %finding.source,
                observed_at = %finding.observed_at(),
                subject = finding.subject.as_deref().unwrap_or(""),
                "{}",
                finding.message
            ),
        }
        Ok(())
    }
}

//! Notification dispatcher: fans each finding out to the enabled channels.

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use hostwatch_config::Config;
use tracing::{error, info, warn};

use crate::channels::{ChannelKind, LogChannel, NotificationChannel};
use crate::error::{panic_message, MonitorError};
use crate::finding::Finding;
use crate::transports::{EmailChannel, WebhookChannel};

/// Notification dispatcher.
///
/// Holds the enabled channels, built once from the config. A channel failure
/// is logged and never reaches the caller or the other channels.
pub struct Dispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl Dispatcher {
    /// Create a dispatcher with only the log channel.
    pub fn new() -> Self {
        Self {
            channels: vec![Box::new(LogChannel)],
        }
    }

    /// Create a dispatcher without any channel.
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Create from config.
    pub fn from_config(config: &Config) -> Self {
        let mut dispatcher = Self::new();

        if let Some(url) = config.webhook_url() {
            info!("Adding webhook notification channel");
            dispatcher.add_channel(Box::new(WebhookChannel::new(url)));
        } else if config.notifications.slack {
            warn!("Webhook notifications enabled but no slack_webhook_url configured");
        }

        if let Some(email) = config.email_settings() {
            info!("Adding email notification channel");
            dispatcher.add_channel(Box::new(EmailChannel::new(email.clone())));
        } else if config.notifications.email {
            warn!("Email notifications enabled but no email settings configured");
        }

        dispatcher
    }

    /// Add a channel.
    pub fn add_channel(&mut self, channel: Box<dyn NotificationChannel>) {
        self.channels.push(channel);
    }

    /// Get list of channel names.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Whether a channel of this kind should receive the finding.
    ///
    /// Email only carries findings with a subject, so routine status
    /// messages stay out of the inbox.
    pub fn routes_to(kind: ChannelKind, finding: &Finding) -> bool {
        match kind {
            ChannelKind::Email => finding.subject.is_some(),
            ChannelKind::Log | ChannelKind::Webhook => true,
        }
    }

    /// Deliver a finding to every routed channel.
    ///
    /// A channel that errors or panics is skipped; the rest still receive the
    /// finding. Returns the delivery errors for inspection; they have already
    /// been logged.
    pub async fn dispatch(&self, finding: &Finding) -> Vec<MonitorError> {
        let mut errors = Vec::new();

        for channel in &self.channels {
            if !Self::routes_to(channel.kind(), finding) {
                continue;
            }
            let outcome = AssertUnwindSafe(channel.send(finding)).catch_unwind().await;
            let result = outcome.unwrap_or_else(|payload| {
                Err(MonitorError::transport(
                    channel.name(),
                    format!("channel panicked: {}", panic_message(&*payload)),
                ))
            });
            if let Err(e) = result {
                error!("Failed to send notification via {}: {}", channel.name(), e);
                errors.push(e);
            }
        }

        errors
    }

    /// Dispatch an info finding.
    pub async fn info(&self, source: &str, message: impl Into<String>) {
        self.dispatch(&Finding::info(source, message)).await;
    }

    /// Dispatch an alert finding.
    pub async fn alert(&self, source: &str, subject: impl Into<String>, message: impl Into<String>) {
        self.dispatch(&Finding::alert(source, subject, message)).await;
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

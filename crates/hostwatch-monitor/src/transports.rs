//! Network-backed channels: webhook (Slack-compatible) and SMTP email.

use std::time::Duration;

use async_trait::async_trait;
use hostwatch_config::EmailConfig;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::channels::{ChannelKind, NotificationChannel};
use crate::error::MonitorError;
use crate::finding::Finding;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const FALLBACK_SUBJECT: &str = "hostwatch notification";

/// Incoming-webhook channel. Posts `{"text": <message>}`.
pub struct WebhookChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// Create a new webhook channel.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            webhook_url: webhook_url.into(),
            client,
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    async fn send(&self, finding: &Finding) -> Result<(), MonitorError> {
        let payload = serde_json::json!({ "text": finding.message });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MonitorError::transport(self.name(), format!("request failed: {}", e)))?;

        if response.status().is_success() {
            debug!("Webhook notification sent");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(MonitorError::transport(
                self.name(),
                format!("webhook returned {}: {}", status, body),
            ))
        }
    }
}

/// SMTP email channel.
///
/// Opens a fresh STARTTLS session and logs in for every message; sessions are
/// not kept between cycles.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    /// Create a new email channel.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, finding: &Finding) -> Result<Message, MonitorError> {
        let from: Mailbox = self
            .config
            .sender
            .parse()
            .map_err(|e| MonitorError::transport(self.name(), format!("invalid sender: {}", e)))?;
        let to: Mailbox = self
            .config
            .receiver
            .parse()
            .map_err(|e| MonitorError::transport(self.name(), format!("invalid receiver: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(finding.subject.as_deref().unwrap_or(FALLBACK_SUBJECT))
            .header(ContentType::TEXT_PLAIN)
            .body(finding.message.clone())
            .map_err(|e| MonitorError::transport(self.name(), format!("build failed: {}", e)))
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, finding: &Finding) -> Result<(), MonitorError> {
        let email = self.build_message(finding)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
            .map_err(|e| MonitorError::transport(self.name(), e))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.sender.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        mailer
            .send(email)
            .await
            .map_err(|e| MonitorError::transport(self.name(), e))?;

        debug!(to = %self.config.receiver, "Email notification sent");
        Ok(())
    }
}

//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
///
/// `log_retention_days`, `thresholds` and `notifications` have no serde
/// default: a file that omits them fails to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Days a log file is kept before the housekeeper removes it.
    pub log_retention_days: u32,

    pub thresholds: Thresholds,

    pub notifications: Notifications,

    /// SMTP settings, required when `notifications.email` is set.
    #[serde(default)]
    pub email: Option<EmailConfig>,

    /// Incoming-webhook URL, required when `notifications.slack` is set.
    #[serde(default)]
    pub slack_webhook_url: Option<String>,

    /// systemd units that must be active.
    #[serde(default)]
    pub services: Vec<String>,

    /// Docker containers that must be running.
    #[serde(default)]
    pub docker_containers: Vec<String>,

    /// Seconds between two health cycles.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Directory holding the daily log files.
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// Mount point sampled by the disk check.
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,
}

/// Alert thresholds. A sample strictly above its threshold raises an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// CPU usage, percent.
    pub cpu: f64,
    /// Memory usage, percent.
    pub memory: f64,
    /// Disk usage, percent.
    pub disk: f64,
    /// Cumulative bytes sent plus received since boot.
    pub network: u64,
}

/// Channel enablement flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    #[serde(default)]
    pub slack: bool,
    #[serde(default)]
    pub email: bool,
    #[serde(default = "default_true")]
    pub log: bool,
}

/// Email alert configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address, also the SMTP login.
    pub sender: String,
    /// Single recipient address.
    pub receiver: String,
    /// SMTP password.
    pub password: String,
    /// SMTP server host.
    pub smtp_server: String,
    /// SMTP port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("password", &"<redacted>")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

fn default_true() -> bool {
    true
}

fn default_check_interval() -> u64 {
    300
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_disk_path() -> PathBuf {
    PathBuf::from("/")
}

fn default_smtp_port() -> u16 {
    587
}

impl Config {
    /// Interval between two health cycles.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// How long a log file is kept.
    pub fn retention_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.log_retention_days) * 24 * 60 * 60)
    }

    /// Whether the webhook channel should be installed.
    pub fn webhook_url(&self) -> Option<&str> {
        if !self.notifications.slack {
            return None;
        }
        self.slack_webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Email settings, if the email channel is enabled.
    pub fn email_settings(&self) -> Option<&EmailConfig> {
        if self.notifications.email {
            self.email.as_ref()
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_retention_days: 7,
            thresholds: Thresholds::default(),
            notifications: Notifications::default(),
            email: None,
            slack_webhook_url: None,
            services: Vec::new(),
            docker_containers: Vec::new(),
            check_interval_secs: default_check_interval(),
            log_directory: default_log_directory(),
            disk_path: default_disk_path(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: 80.0,
            memory: 80.0,
            disk: 90.0,
            network: 10 * 1024 * 1024 * 1024,
        }
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            slack: false,
            email: false,
            log: default_true(),
        }
    }
}

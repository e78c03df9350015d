//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse all errors into a single [`ConfigError::Invalid`].
    ///
    /// Returns the warnings when the configuration is valid.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Invalid(joined))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_schedule(config, &mut result);
        Self::validate_thresholds(config, &mut result);
        Self::validate_notifications(config, &mut result);
        Self::validate_targets(config, &mut result);

        Ok(result)
    }

    fn validate_schedule(config: &Config, result: &mut ValidationResult) {
        if config.log_retention_days == 0 {
            result.add_error(ValidationError::new(
                "log_retention_days",
                "must be at least 1 day",
            ));
        }

        if config.check_interval_secs == 0 {
            result.add_error(ValidationError::new(
                "check_interval_secs",
                "must be greater than 0",
            ));
        }

        if config.log_directory.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "log_directory",
                "cannot be empty",
            ));
        }
    }

    fn validate_thresholds(config: &Config, result: &mut ValidationResult) {
        let percentages = [
            ("thresholds.cpu", config.thresholds.cpu),
            ("thresholds.memory", config.thresholds.memory),
            ("thresholds.disk", config.thresholds.disk),
        ];

        for (path, value) in percentages {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                result.add_error(ValidationError::new(
                    path,
                    format!("must be a percentage within 0..=100, got {}", value),
                ));
            }
        }
    }

    fn validate_notifications(config: &Config, result: &mut ValidationResult) {
        if !config.notifications.log {
            result.add_warning(ValidationWarning::new(
                "notifications.log",
                "the log channel cannot be disabled; findings are always written to the log",
            ));
        }

        if config.notifications.slack && config.webhook_url().is_none() {
            result.add_error(ValidationError::new(
                "slack_webhook_url",
                "required when notifications.slack is enabled",
            ));
        }

        if config.notifications.email {
            match config.email {
                None => result.add_error(ValidationError::new(
                    "email",
                    "required when notifications.email is enabled",
                )),
                Some(ref email) => {
                    let fields = [
                        ("email.sender", &email.sender),
                        ("email.receiver", &email.receiver),
                        ("email.smtp_server", &email.smtp_server),
                    ];
                    for (path, value) in fields {
                        if value.trim().is_empty() {
                            result.add_error(ValidationError::new(path, "cannot be empty"));
                        }
                    }
                    if email.smtp_port == 0 {
                        result.add_error(ValidationError::new(
                            "email.smtp_port",
                            "port cannot be 0",
                        ));
                    }
                }
            }
        }
    }

    fn validate_targets(config: &Config, result: &mut ValidationResult) {
        if config.services.is_empty() && config.docker_containers.is_empty() {
            result.add_warning(ValidationWarning::new(
                "services",
                "no services or docker containers are watched; only resource checks will run",
            ));
        }

        for (i, name) in config.services.iter().enumerate() {
            if name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("services[{}]", i),
                    "service name cannot be empty",
                ));
            }
        }

        for (i, name) in config.docker_containers.iter().enumerate() {
            if name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("docker_containers[{}]", i),
                    "container name cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

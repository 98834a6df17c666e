//! Configuration validation logic
//!
//! Range and format checks for every configuration section. Secrets are
//! checked separately by [`Settings::check_tokens`].

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, LoggerSettings, PollerConfig, PracticumConfig, Settings, TelegramConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Valid rotation strategies
const VALID_ROTATION_STRATEGIES: &[&str] = &["size", "daily"];

/// Longest accepted poll interval (one day)
pub const MAX_RETRY_INTERVAL: u64 = 86_400;

fn is_http_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

impl PracticumConfig {
    /// # Validation Rules
    /// - Endpoint must be an absolute http(s) URL
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.endpoint) {
            return Err(ConfigError::ValidationError {
                field: "practicum.endpoint".to_string(),
                message: format!("'{}' is not an http(s) URL", self.endpoint),
            });
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "practicum.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl TelegramConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_url) {
            return Err(ConfigError::ValidationError {
                field: "telegram.api_url".to_string(),
                message: format!("'{}' is not an http(s) URL", self.api_url),
            });
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "telegram.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl PollerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_interval == 0 || self.retry_interval > MAX_RETRY_INTERVAL {
            return Err(ConfigError::ValidationError {
                field: "poller.retry_interval".to_string(),
                message: format!(
                    "Retry interval must be between 1 and {} seconds, got {}.",
                    MAX_RETRY_INTERVAL, self.retry_interval
                ),
            });
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if !VALID_ROTATION_STRATEGIES.contains(&self.rotation.strategy.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.rotation.strategy".to_string(),
                message: format!(
                    "Invalid rotation strategy '{}'. Valid strategies are: {}",
                    self.rotation.strategy,
                    VALID_ROTATION_STRATEGIES.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all sections, returning the first error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.practicum.validate()?;
        self.telegram.validate()?;
        self.poller.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

//! Configuration settings structures for homework-bot
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{
    ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig, RotationStrategy,
};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "homework-bot".to_string()
}

fn default_practicum_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_retry_interval() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/homework-bot.log".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

fn default_rotation_strategy() -> String {
    "size".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_files() -> usize {
    5
}

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

// ============================================================================
// Review API Configuration
// ============================================================================

/// Homework review-status API access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticumConfig {
    /// Status endpoint polled with `from_date`
    #[serde(default = "default_practicum_endpoint")]
    pub endpoint: String,

    /// OAuth token sent as `Authorization: OAuth <token>`
    #[serde(default)]
    pub token: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_practicum_endpoint(),
            token: String::new(),
            request_timeout: default_request_timeout(),
        }
    }
}

// ============================================================================
// Telegram Configuration
// ============================================================================

/// Telegram Bot API access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,

    /// Bot token issued by BotFather
    #[serde(default)]
    pub token: String,

    /// Destination chat id (numeric id or `@channel`)
    #[serde(default)]
    pub chat_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            token: String::new(),
            chat_id: String::new(),
            request_timeout: default_request_timeout(),
        }
    }
}

// ============================================================================
// Poller Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between polls; also the delay after a failed cycle
    #[serde(default = "default_retry_interval")]
    pub retry_interval: u64,

    /// Call `getMe` before the first poll and stop if the bot is rejected
    #[serde(default = "default_true")]
    pub verify_bot_on_startup: bool,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            retry_interval: default_retry_interval(),
            verify_bot_on_startup: default_true(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// Rotation settings for file logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// Rotation strategy: "size" or "daily"
    #[serde(default = "default_rotation_strategy")]
    pub strategy: String,

    /// Maximum file size in bytes before rotation
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum number of rotated files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            strategy: default_rotation_strategy(),
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
            rotation: RotationSettings::default(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;
        let rotation = self.rotation.into_rotation_config()?;

        FileConfig::new(
            self.enabled,
            PathBuf::from(self.path),
            self.append,
            format,
            rotation,
        )
        .map_err(|e| ConfigError::ValidationError {
            field: "logger.file".to_string(),
            message: e.to_string(),
        })
    }
}

impl RotationSettings {
    pub fn into_rotation_config(self) -> Result<RotationConfig, ConfigError> {
        let strategy = self
            .strategy
            .parse::<RotationStrategy>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.rotation.strategy".to_string(),
                message: e.to_string(),
            })?;

        RotationConfig::new(strategy, self.max_size, self.max_files).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger.file.rotation".to_string(),
                message: e.to_string(),
            }
        })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub practicum: PracticumConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}

/// The three secrets the bot cannot run without
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Credentials {
    /// Re-check that no secret is blank.
    pub fn ensure_present(&self) -> Result<(), ConfigError> {
        let secrets = [
            ("practicum.token", &self.practicum_token),
            ("telegram.token", &self.telegram_token),
            ("telegram.chat_id", &self.chat_id),
        ];
        match secrets.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(ConfigError::missing_secret(*key)),
            None => Ok(()),
        }
    }
}

impl Settings {
    /// Collect the required secrets, failing on the first absent one.
    pub fn check_tokens(&self) -> Result<Credentials, ConfigError> {
        let credentials = Credentials {
            practicum_token: self.practicum.token.trim().to_string(),
            telegram_token: self.telegram.token.trim().to_string(),
            chat_id: self.telegram.chat_id.trim().to_string(),
        };
        credentials.ensure_present()?;
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secrets() -> Settings {
        let mut settings = Settings::default();
        settings.practicum.token = "y0_practicum".to_string();
        settings.telegram.token = "123:bot".to_string();
        settings.telegram.chat_id = "42".to_string();
        settings
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.poller.retry_interval, 600);
        assert_eq!(settings.poller.interval(), Duration::from_secs(600));
        assert!(settings.poller.verify_bot_on_startup);
        assert!(settings.practicum.endpoint.ends_with("/homework_statuses/"));
        assert_eq!(settings.telegram.api_url, "https://api.telegram.org");
    }

    #[test]
    fn test_check_tokens_present() {
        let credentials = with_secrets().check_tokens().unwrap();
        assert_eq!(credentials.chat_id, "42");
        assert_eq!(credentials.practicum_token, "y0_practicum");
    }

    #[test]
    fn test_check_tokens_reports_first_missing_secret() {
        let mut settings = with_secrets();
        settings.telegram.token = "   ".to_string();
        settings.telegram.chat_id = String::new();

        match settings.check_tokens() {
            Err(ConfigError::MissingSecret { key }) => assert_eq!(key, "telegram.token"),
            other => panic!("Expected MissingSecret, got {other:?}"),
        }
    }

    #[test]
    fn test_credentials_debug_hides_tokens() {
        let credentials = with_secrets().check_tokens().unwrap();
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("y0_practicum"));
        assert!(!rendered.contains("123:bot"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn test_logger_settings_conversion() {
        let mut logger = LoggerSettings::default();
        logger.file.enabled = true;
        logger.file.format = "json".to_string();
        logger.file.rotation.strategy = "daily".to_string();

        let config = logger.into_logger_config().unwrap();
        assert_eq!(config.file.format, LogFormat::Json);
        assert_eq!(config.file.rotation.strategy, RotationStrategy::Daily);
    }

    #[test]
    fn test_settings_deserialize_partial_toml() {
        let raw = r#"
[telegram]
chat_id = "-100500"

[poller]
retry_interval = 60
"#;
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.telegram.chat_id, "-100500");
        assert_eq!(settings.poller.retry_interval, 60);
        assert_eq!(settings.practicum, PracticumConfig::default());
    }
}

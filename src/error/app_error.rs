use crate::config::error::ConfigError;
use thiserror::Error;

/// Default text for a response body that does not have the expected shape.
pub const MALFORMED_RESPONSE: &str = "API returned a malformed response";

/// Application-wide error type.
///
/// Every failure the poller can run into is one variant here. Only
/// [`AppError::Configuration`] is fatal; everything else is contained by the
/// polling loop, reported to the chat and retried after the fixed interval.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network-level failure reaching a remote endpoint
    #[error("Transport error while {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// Review-status endpoint answered with a non-success HTTP status
    #[error("Unexpected response from the review API: HTTP {status}")]
    UpstreamStatus { status: u16 },

    /// Response body is not an object or `homeworks` is missing / not a list
    #[error("{message}")]
    MalformedResponse { message: String },

    /// Status code outside the verdict catalog
    #[error("API returned an unknown homework status: {status}")]
    UnknownVerdict { status: String },

    /// Homework record without a `status` field
    #[error("API did not return a status")]
    MissingStatus,

    /// Homework record without a `homework_name` field
    #[error("API did not return a homework name")]
    MissingName,

    /// Chat API refused or failed to deliver a message
    #[error("Notification via {provider} failed: {message}")]
    Notification {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Chat API rejected the bot credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Required configuration value is missing or invalid
    #[error("Configuration error: {key}: {message}")]
    Configuration { key: String, message: String },

    /// Internal error for unexpected failures
    #[error("Internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Whether the process must stop instead of retrying on the next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Configuration { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            ConfigError::MissingSecret { key } => key.clone(),
            _ => "config".to_string(),
        };
        AppError::Configuration {
            key,
            message: error.to_string(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

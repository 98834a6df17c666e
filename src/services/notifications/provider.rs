//! Core notification provider trait and types.

use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text message addressed to the configured chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub text: String,
}

impl NotificationMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Outcome of a successful delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// HTTP status code returned by the chat API
    pub status_code: u16,
    /// Identifier the chat API assigned to the delivered message
    pub message_id: Option<i64>,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

/// Delivery channel for chat messages.
///
/// Implementations return `Err` for every message that did not reach the
/// chat, so callers can rely on `Ok` meaning "delivered".
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Sends a notification message
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult>;

    /// Returns the provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// Checks that the provider's credentials are accepted (optional, default no-op)
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}

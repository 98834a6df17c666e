//! Duplicate-suppressing message delivery.

use super::provider::{NotificationMessage, NotificationProvider};
use crate::error::AppResult;
use std::sync::Arc;

/// Sends chat messages, skipping a message identical to the last delivered one.
///
/// The memo is updated only after the provider confirms delivery, so a
/// message that failed to send is attempted again next time it comes up.
pub struct NotificationService {
    provider: Arc<dyn NotificationProvider>,
    last_sent: Option<String>,
}

impl NotificationService {
    pub fn new(provider: Arc<dyn NotificationProvider>) -> Self {
        Self {
            provider,
            last_sent: None,
        }
    }

    /// Text of the last message the chat actually received
    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    /// Verify the provider credentials without sending anything.
    pub async fn verify(&self) -> AppResult<()> {
        self.provider.validate_config().await
    }

    /// Deliver `text` unless it repeats the last delivered message.
    ///
    /// Returns `Ok(true)` when a message went out and `Ok(false)` when it
    /// was suppressed as a duplicate.
    pub async fn send_message(&mut self, text: &str) -> AppResult<bool> {
        if self.last_sent.as_deref() == Some(text) {
            tracing::debug!(text, "Skipping duplicate notification");
            return Ok(false);
        }

        let result = self
            .provider
            .send(&NotificationMessage::new(text))
            .await
            .inspect_err(|e| {
                tracing::error!(provider = self.provider.name(), error = %e, "Failed to send notification");
            })?;

        tracing::info!(
            provider = self.provider.name(),
            status_code = result.status_code,
            message_id = ?result.message_id,
            duration_ms = result.duration_ms,
            "Notification sent"
        );
        self.last_sent = Some(text.to_string());
        Ok(true)
    }
}

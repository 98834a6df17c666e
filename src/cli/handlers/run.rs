//! Run command handler
//!
//! Handles the run command including dry-run validation and the polling loop.

use super::resolve_cursor;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::services::{PollOutcome, StatusPoller};
use tokio_util::sync::CancellationToken;

/// Handler for the run command
pub struct RunCommandHandler {
    config: Settings,
}

impl RunCommandHandler {
    /// Create a new run command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the run command
    ///
    /// # Errors
    /// - Missing secrets
    /// - Bot token rejected at startup
    pub async fn execute(
        &self,
        from_date: Option<i64>,
        dry_run: bool,
        shutdown: CancellationToken,
    ) -> AppResult<()> {
        let mut poller = StatusPoller::from_settings(&self.config, resolve_cursor(from_date))?;

        if dry_run {
            return self.validate_only(&poller);
        }

        if self.config.poller.verify_bot_on_startup {
            Self::verify_bot(&poller).await?;
        }

        tracing::info!(
            app_name = %self.config.application.name,
            app_version = crate::pkg_version(),
            "Application starting"
        );

        match poller.run(shutdown).await? {
            PollOutcome::Interrupted => {
                tracing::info!("Shutdown complete");
                Ok(())
            }
        }
    }

    /// Fail on a rejected bot token; other startup failures only warn, the
    /// loop retries them anyway.
    async fn verify_bot(poller: &StatusPoller) -> AppResult<()> {
        match poller.notifier().verify().await {
            Ok(()) => Ok(()),
            Err(e @ AppError::Unauthorized { .. }) => {
                tracing::error!(error = %e, "Telegram bot credentials rejected");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not verify Telegram bot at startup");
                Ok(())
            }
        }
    }

    /// Report the effective configuration without polling
    fn validate_only(&self, poller: &StatusPoller) -> AppResult<()> {
        println!("✓ Configuration is valid");
        println!("✓ Secrets are present");
        println!("✓ Review API endpoint: {}", self.config.practicum.endpoint);
        println!("✓ Poll interval: {}s", poller.interval().as_secs());
        println!("✓ Starting cursor: {}", poller.state().cursor);
        println!("Dry run completed successfully - ready to poll");
        Ok(())
    }
}

//! Once command handler

use super::resolve_cursor;
use crate::config::Settings;
use crate::error::AppResult;
use crate::services::{CycleOutcome, StatusPoller};

/// Handler for the once command
pub struct OnceCommandHandler {
    config: Settings,
}

impl OnceCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Run one cycle and print what it did
    pub async fn execute(&self, from_date: Option<i64>) -> AppResult<CycleOutcome> {
        let mut poller = StatusPoller::from_settings(&self.config, resolve_cursor(from_date))?;

        let outcome = poller.run_cycle().await?;
        match &outcome {
            CycleOutcome::NoUpdates => println!("No homework updates"),
            CycleOutcome::Unchanged => println!("Homework status unchanged"),
            CycleOutcome::Notified(message) => println!("Sent: {message}"),
            CycleOutcome::Suppressed(message) => println!("Already sent: {message}"),
        }
        Ok(outcome)
    }
}

//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{CheckCommandHandler, OnceCommandHandler, RunCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;
use tokio_util::sync::CancellationToken;

/// Execute a CLI command with the given settings
///
/// `shutdown` is cancelled by the signal handler; only `run` listens to it.
///
/// # Errors
/// Returns errors from command handlers. The caller maps any error to a
/// non-zero exit status.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    shutdown: CancellationToken,
) -> AppResult<()> {
    match cli.command_or_default() {
        Commands::Run {
            from_date, dry_run, ..
        } => {
            RunCommandHandler::new(settings)
                .execute(from_date, dry_run, shutdown)
                .await
        }
        Commands::Check => CheckCommandHandler::new(settings).execute().await,
        Commands::Once { from_date } => OnceCommandHandler::new(settings)
            .execute(from_date)
            .await
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.practicum.token = "y0_practicum".to_string();
        config.telegram.token = "123:bot".to_string();
        config.telegram.chat_id = "42".to_string();
        config
    }

    #[tokio::test]
    async fn test_execute_run_dry_run() {
        let cli = Cli::try_parse_from(["homework-bot", "run", "--dry-run"]).unwrap();
        let result = execute_command(&cli, create_valid_config(), CancellationToken::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_without_secrets_fails() {
        for args in [
            vec!["homework-bot", "run", "--dry-run"],
            vec!["homework-bot", "check"],
            vec!["homework-bot", "once"],
        ] {
            let cli = Cli::try_parse_from(&args).unwrap();
            let err = execute_command(&cli, Settings::default(), CancellationToken::new())
                .await
                .unwrap_err();
            assert!(err.is_fatal(), "{args:?} should fail on missing secrets");
        }
    }
}

//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Relays homework review-status changes to a Telegram chat
#[derive(Parser, Debug)]
#[command(name = "homework-bot")]
#[command(about = "Relays homework review-status changes to a Telegram chat")]
#[command(long_about = "
homework-bot polls the homework review-status API at a fixed interval and
sends a Telegram message whenever the verdict on the newest submission
changes. Failures are reported to the same chat and retried on the next cycle.

Secrets are read from PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID
(a .env file in the working directory is loaded first).

EXAMPLES:
    # Poll forever with the configured interval
    homework-bot run

    # Poll every minute, starting from a given moment
    homework-bot run --interval 60 --from-date 2026-10-01T00:00:00Z

    # Validate configuration and secrets without polling
    homework-bot run --dry-run

    # Check that Telegram accepts the bot token
    homework-bot check

    # Run a single cycle, e.g. from cron
    homework-bot --quiet once --from-date 0
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute (`run` when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Use a single TOML file instead of the layered `config/` directory.
    /// Environment variables still override values from the file.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/homework-bot/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects the `{environment}.toml` configuration layer instead of the
    /// one named by HWBOT_APP_ENV.
    ///
    /// Available values: development (dev), test, staging (stage), production (prod)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Poll for status changes until interrupted (default)
    ///
    /// Examples:
    ///   homework-bot run                      # Start with configured settings
    ///   homework-bot run --interval 300       # Poll every five minutes
    ///   homework-bot run --dry-run            # Validate config and secrets only
    Run {
        /// Seconds between polls, overrides poller.retry_interval
        ///
        /// Must be between 1 and 86400.
        #[arg(short, long, value_name = "SECS", value_parser = super::validation::validate_interval)]
        interval: Option<u64>,

        /// Starting cursor, unix seconds or RFC 3339 timestamp
        ///
        /// Default: the current time
        #[arg(long, value_name = "TIMESTAMP", value_parser = super::validation::validate_from_date)]
        from_date: Option<i64>,

        /// Validate configuration and secrets and exit
        ///
        /// Returns exit code 0 if valid, non-zero if invalid.
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify configuration, secrets and the Telegram bot token
    ///
    /// Calls Telegram `getMe` and exits without polling.
    Check,
    /// Run a single polling cycle and exit with its result
    ///
    /// No pause and no failure report to the chat.
    Once {
        /// Starting cursor, unix seconds or RFC 3339 timestamp
        #[arg(long, value_name = "TIMESTAMP", value_parser = super::validation::validate_from_date)]
        from_date: Option<i64>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            interval: None,
            from_date: None,
            dry_run: false,
        }
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl Cli {
    /// The command to execute, `run` with defaults when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    /// Environment whose configuration layer is loaded: `--env`, else
    /// `HWBOT_APP_ENV`
    pub fn environment(&self) -> crate::config::Environment {
        self.env
            .map(Into::into)
            .unwrap_or_else(crate::config::Environment::from_env)
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

//! CLI module for homework-bot
//!
//! Argument parsing with clap, merging of CLI overrides into the loaded
//! configuration, and dispatch to the `run`, `check` and `once` handlers.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment};

use crate::config::Settings;
use crate::logger::init_logger;

/// Load configuration and apply the CLI overrides
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_sources(cli.config.as_deref(), cli.env.map(Into::into))?;
    Ok(merger.merge_cli_args(cli)?)
}

/// Initialize logger from settings
///
/// # Errors
/// Returns error if the logger configuration is invalid or a global
/// subscriber is already installed
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)?;
    Ok(())
}

//! Configuration merger for CLI arguments and config files
//!
//! Command-line values take precedence over every configuration source.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};
use std::path::Path;

/// Applies CLI overrides on top of file and environment configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration.
    ///
    /// With `config_path` only that file (plus environment variables) is
    /// read; otherwise the layered `config/` directory is used.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_sources(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::file_not_found(path.display().to_string()));
                }
                ConfigLoader::with_config_file(path)
            }
            None => ConfigLoader::new()?,
        };

        let loader = match environment {
            Some(env) => loader.with_environment(env),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// The merged settings are validated again before being returned.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        if let Commands::Run {
            interval: Some(secs),
            ..
        } = command
        {
            config.poller.retry_interval = *secs;
        }
    }
}

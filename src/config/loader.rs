//! Configuration loader for homework-bot
//!
//! `ConfigLoader` assembles `Settings` from files and the process
//! environment with a fixed precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "HWBOT_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "HWBOT_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "HWBOT";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Plain secret variables and the keys they override. These win over every
/// other source so an existing `.env` keeps working unchanged.
const SECRET_ENV_VARS: &[(&str, &str)] = &[
    ("PRACTICUM_TOKEN", "practicum.token"),
    ("TELEGRAM_TOKEN", "telegram.token"),
    ("TELEGRAM_CHAT_ID", "telegram.chat_id"),
];

/// Configuration loader that handles layered configuration loading
///
/// Sources in order of priority (lowest first):
/// 1. `default.toml`
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `HWBOT_*` environment variables
/// 5. `PRACTICUM_TOKEN` / `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID`
///
/// All files are optional in layered mode. A single file set through
/// `HWBOT_CONFIG_FILE` or [`ConfigLoader::with_config_file`] must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `HWBOT_CONFIG_DIR`, `HWBOT_CONFIG_FILE` and
    /// `HWBOT_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both `HWBOT_CONFIG_DIR` and `HWBOT_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "HWBOT_CONFIG_DIR and HWBOT_CONFIG_FILE cannot both be set. \
                 Use HWBOT_CONFIG_DIR for layered configuration or \
                 HWBOT_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loader reading exactly one file (plus environment overrides).
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Force a specific environment layer
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the single configuration file does not exist
    /// - parsing or deserialization fails
    /// - validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // FOO__BAR style keys map to foo.bar
        let builder = Self::add_env_source(builder);
        let builder = Self::add_secret_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let layers = [
            self.config_dir.join("default.toml"),
            self.config_dir.join(self.environment.config_file_name()),
            self.config_dir.join("local.toml"),
        ];

        layers
            .iter()
            .try_fold(builder, |builder, path| Self::add_file_source(builder, path, false))
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!("Non UTF-8 configuration path: {}", path.display()))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }

    /// `HWBOT_TELEGRAM__CHAT_ID` -> `telegram.chat_id`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(false),
        )
    }

    fn add_secret_overrides(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        SECRET_ENV_VARS.iter().try_fold(builder, |builder, (var, key)| {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder
                .set_override_option(*key, value)
                .map_err(ConfigError::from)
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}

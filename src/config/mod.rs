//! Configuration management for homework-bot
//!
//! Layered loading with the `config` crate:
//! 1. `default.toml` - base values (optional, every non-secret has a default)
//! 2. `{environment}.toml` - environment-specific values
//! 3. `local.toml` - local overrides, not committed
//! 4. `HWBOT_*` environment variables
//! 5. `PRACTICUM_TOKEN`, `TELEGRAM_TOKEN`, `TELEGRAM_CHAT_ID` (optionally from `.env`)

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{Credentials, PollerConfig, PracticumConfig, Settings, TelegramConfig};

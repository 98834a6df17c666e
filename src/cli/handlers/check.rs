//! Check command handler

use crate::config::Settings;
use crate::error::AppResult;
use crate::services::{NotificationProvider, TelegramProvider};

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate secrets and ask Telegram whether the bot token is accepted
    pub async fn execute(&self) -> AppResult<()> {
        let credentials = self.config.check_tokens()?;
        println!("✓ Configuration is valid");
        println!("✓ Secrets are present");

        let provider = TelegramProvider::new(
            &self.config.telegram,
            credentials.telegram_token,
            credentials.chat_id,
        );
        let identity = provider.get_me().await?;
        println!(
            "✓ Telegram accepted the bot token ({})",
            identity.username.as_deref().unwrap_or(&identity.first_name)
        );
        println!("✓ Notifications go through the {} provider", provider.name());
        Ok(())
    }
}

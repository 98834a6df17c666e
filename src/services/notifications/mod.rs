//! Chat notification with a pluggable delivery provider.
//!
//! `NotificationProvider` is the delivery seam; `TelegramProvider` is the
//! production implementation and `NotificationService` adds duplicate
//! suppression on top of whichever provider it wraps.

mod provider;
mod telegram_provider;

pub mod notification_service;

pub use notification_service::NotificationService;
pub use provider::{NotificationMessage, NotificationProvider, NotificationResult};
pub use telegram_provider::{BotIdentity, TelegramProvider};

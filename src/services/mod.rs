//! Polling, status extraction and chat notification.

pub mod notifications;
pub mod poller;
pub mod status;

pub use notifications::{NotificationProvider, NotificationService, TelegramProvider};
pub use poller::{CycleOutcome, PollOutcome, StatusPoller};
pub use status::{PollState, check_response, parse_status};

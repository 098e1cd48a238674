//! Telegram relay for homework review status changes.
//!
//! Wires [`homework_core::PollLoop`] to a Telegram chat. The binary
//! (`homework-bot`) reads secrets from the environment, builds a
//! [`TelegramNotifier`] and polls forever.
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: status API token
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: numeric chat id or `@channel`

pub mod error;
pub mod notifier;

pub use error::{Result, TelegramError};
pub use notifier::{parse_destination, TelegramNotifier};

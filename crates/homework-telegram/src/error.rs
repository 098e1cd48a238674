//! Error types for the Telegram relay.

use homework_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while setting up the Telegram side.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client for the Bot API could not be built.
    #[error("Failed to build Telegram HTTP client: {0}")]
    ClientBuild(String),

    /// The Bot API rejected the token or was unreachable.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

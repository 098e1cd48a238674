//! Telegram implementation of the [`Notifier`] seam.

use std::time::Duration;

use async_trait::async_trait;
use homework_core::{ConfigError, DeliveryError, Notifier};
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::debug;

use crate::error::{Result, TelegramError};

/// Sends notifications to a single Telegram chat.
pub struct TelegramNotifier {
    bot: Bot,
    destination: Recipient,
}

impl TelegramNotifier {
    /// Create a notifier for `chat`, a numeric chat id or `@channel`.
    ///
    /// Every Bot API request is bounded by `timeout`.
    pub fn new(token: impl Into<String>, chat: &str, timeout: Duration) -> Result<Self> {
        let destination = parse_destination(chat)?;
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()
            .map_err(|e| TelegramError::ClientBuild(e.to_string()))?;

        Ok(Self::with_bot(Bot::with_client(token, client), destination))
    }

    /// Create a notifier around an existing bot.
    pub fn with_bot(bot: Bot, destination: Recipient) -> Self {
        Self { bot, destination }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, message: &str) -> std::result::Result<(), DeliveryError> {
        debug!(chat = ?self.destination, len = message.len(), "sending Telegram message");
        self.bot
            .send_message(self.destination.clone(), message)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

/// Parse a chat destination: a (possibly negative) numeric id or `@channel`.
pub fn parse_destination(chat: &str) -> std::result::Result<Recipient, ConfigError> {
    let chat = chat.trim();

    if let Ok(id) = chat.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if chat.len() > 1 && chat.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat.to_string()));
    }

    Err(ConfigError::InvalidValue {
        name: homework_core::config::TELEGRAM_CHAT_ID_ENV,
        value: chat.to_string(),
    })
}

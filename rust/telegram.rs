//! Telegram Bot API notifier

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;

use crate::config::Config;
use crate::error::BotError;

/// Delivers a rendered message to the chat.
#[async_trait]
pub trait Notifier {
    async fn send_message(&self, text: &str) -> Result<(), BotError>;
}

/// Sends to the configured chat through the Bot API.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: String,
    token: String,
}

impl TelegramNotifier {
    pub fn from_config(config: &Config) -> Result<Self, BotError> {
        let http = teloxide::net::default_reqwest_settings()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| BotError::Delivery(format!("Failed to build Telegram client: {}", err)))?;
        let api_url = config
            .telegram_api_url
            .parse()
            .map_err(|err| BotError::Delivery(format!("Invalid TELEGRAM_API_URL: {}", err)))?;

        Ok(Self {
            bot: Bot::with_client(config.telegram_token.clone(), http).set_api_url(api_url),
            chat_id: config.telegram_chat_id.clone(),
            token: config.telegram_token.clone(),
        })
    }

    /// Numeric ids address users and groups, anything else is a `@channel` name.
    fn recipient(&self) -> Recipient {
        match self.chat_id.trim().parse::<i64>() {
            Ok(id) => Recipient::Id(ChatId(id)),
            Err(_) => Recipient::ChannelUsername(self.chat_id.trim().to_string()),
        }
    }

    async fn deliver(&self, text: &str) -> Result<(), BotError> {
        self.bot
            .send_message(self.recipient(), text)
            .await
            .map(|_| ())
            .map_err(|err| BotError::Delivery(err.to_string().replace(&self.token, "***")))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<(), BotError> {
        match self.deliver(text).await {
            Ok(()) => {
                tracing::info!(chat_id = %self.chat_id, "Message sent successfully");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, chat_id = %self.chat_id, "Failed to send Telegram message");
                Err(err)
            }
        }
    }
}

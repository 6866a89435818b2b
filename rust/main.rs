mod bot;
mod config;
mod error;
mod logger;
mod models;
mod practicum;
mod review;
mod telegram;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};

use crate::bot::Bot;
use crate::config::Config;
use crate::practicum::PracticumClient;
use crate::telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging();

    let config = Config::from_env().context("PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID must be set in .env file")?;

    tracing::info!(
        endpoint = %config.endpoint,
        retry_secs = config.retry_interval.as_secs(),
        error_retry_secs = config.error_retry_interval.as_secs(),
        forward_errors = config.forward_errors,
        "Starting homework status bot"
    );

    let source = PracticumClient::from_config(&config).context("Failed to build Practicum client")?;
    let notifier = TelegramNotifier::from_config(&config).context("Failed to build Telegram client")?;
    let cursor = chrono::Utc::now().timestamp();
    let mut bot = Bot::new(&config, source, notifier, cursor);

    tokio::select! {
        _ = bot.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
        }
    }

    tracing::info!(cursor = bot.cursor(), "Interrupted, shutting down");

    Ok(())
}

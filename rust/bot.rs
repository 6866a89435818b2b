//! Polling loop
//!
//! One cycle: ask Practicum for changes since the cursor, validate the
//! answer, render the newest status, send it, then move the cursor to the
//! server's `current_date`. Any failure leaves the cursor where it was and
//! the cycle is retried after the error delay.

use std::time::Duration;

use crate::config::Config;
use crate::error::BotError;
use crate::practicum::HomeworkSource;
use crate::review::{check_response, parse_status};
use crate::telegram::Notifier;

const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a successful cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Notified,
    NoChanges,
}

/// Owns the cursor and drives the poll/notify cycle.
pub struct Bot<S, N> {
    source: S,
    notifier: N,
    cursor: i64,
    retry_interval: Duration,
    error_retry_interval: Duration,
    forward_errors: bool,
    last_forwarded: Option<String>,
}

impl<S, N> Bot<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(config: &Config, source: S, notifier: N, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            cursor,
            retry_interval: config.retry_interval,
            error_retry_interval: config.error_retry_interval,
            forward_errors: config.forward_errors,
            last_forwarded: None,
        }
    }

    /// Timestamp the next poll will ask from.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// One cycle without sleeping. The cursor only moves on success.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, BotError> {
        let response = self.source.get_api_answer(self.cursor).await?;
        let answer = check_response(&response)?;

        let outcome = match answer.homeworks.first() {
            Some(homework) => {
                let message = parse_status(homework)?;
                self.notifier.send_message(&message).await?;
                CycleOutcome::Notified
            }
            None => {
                tracing::debug!(cursor = self.cursor, "No homework status changes");
                CycleOutcome::NoChanges
            }
        };

        self.advance_cursor(answer.current_date);
        Ok(outcome)
    }

    fn advance_cursor(&mut self, current_date: Option<i64>) {
        match current_date {
            Some(date) if date >= self.cursor => self.cursor = date,
            Some(date) => {
                tracing::warn!(cursor = self.cursor, current_date = date, "Server date is behind the cursor, keeping cursor");
            }
            None => {
                tracing::warn!(cursor = self.cursor, "Answer has no current_date, keeping cursor");
            }
        }
    }

    /// Run one cycle and return how long to wait before the next one.
    pub async fn step(&mut self) -> Duration {
        match self.poll_once().await {
            Ok(outcome) => {
                tracing::debug!(?outcome, cursor = self.cursor, "Cycle finished");
                self.retry_interval
            }
            Err(err) => {
                self.report_failure(&err).await;
                self.error_retry_interval
            }
        }
    }

    async fn report_failure(&mut self, err: &BotError) {
        let message = format!("{}: {}", FAILURE_PREFIX, err);
        tracing::error!(retryable = err.is_retryable(), "{}", message);

        // The notifier cannot report its own failure.
        if !self.forward_errors || err.is_delivery() {
            return;
        }
        if self.last_forwarded.as_deref() == Some(message.as_str()) {
            return;
        }
        match self.notifier.send_message(&message).await {
            Ok(()) => self.last_forwarded = Some(message),
            Err(send_err) => {
                tracing::warn!(error = %send_err, "Could not forward failure to Telegram");
            }
        }
    }

    /// Cycle forever; only process termination stops it.
    pub async fn run(&mut self) {
        tracing::info!(cursor = self.cursor, "Polling loop started");
        loop {
            let delay = self.step().await;
            tokio::time::sleep(delay).await;
        }
    }
}

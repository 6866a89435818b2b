//! Practicum homework statuses API client

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::error::BotError;

/// Anything that can answer "what changed since `from_date`".
#[async_trait]
pub trait HomeworkSource {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, BotError>;
}

/// `reqwest` client for the homework statuses endpoint.
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn from_config(config: &Config) -> Result<Self, BotError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.practicum_token.clone(),
        })
    }

    async fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(BotError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, BotError> {
        let from_date = if from_date == 0 {
            chrono::Utc::now().timestamp()
        } else {
            from_date
        };

        tracing::debug!(from_date, endpoint = %self.endpoint, "Requesting homework statuses");
        match self.fetch(from_date).await {
            Ok(answer) => Ok(answer),
            Err(err) => {
                tracing::warn!(error = %err, "Practicum API request failed");
                Err(err)
            }
        }
    }
}

use thiserror::Error;

/// Failures of a single polling cycle.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Practicum request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Practicum API returned status {status}")]
    HttpStatus { status: u16 },

    #[error("Practicum response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("Field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown homework status {0}")]
    UnknownStatus(String),

    #[error("Failed to deliver Telegram message: {0}")]
    Delivery(String),
}

impl BotError {
    /// Whether waiting the short error delay can plausibly fix this.
    pub fn is_retryable(&self) -> bool {
        match self {
            BotError::Transport(_) => true,
            BotError::HttpStatus { status } => *status >= 500 || *status == 429 || *status == 408,
            BotError::Decode(_) => true,
            BotError::MissingField(_) => true,
            BotError::WrongType { .. } => true,
            BotError::UnknownStatus(_) => false,
            BotError::Delivery(_) => true,
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, BotError::Delivery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        assert!(BotError::HttpStatus { status: 500 }.is_retryable());
        assert!(BotError::HttpStatus { status: 503 }.is_retryable());
        assert!(BotError::HttpStatus { status: 429 }.is_retryable());
    }

    #[test]
    fn auth_errors_are_permanent() {
        assert!(!BotError::HttpStatus { status: 401 }.is_retryable());
        assert!(!BotError::HttpStatus { status: 403 }.is_retryable());
        assert!(!BotError::HttpStatus { status: 404 }.is_retryable());
    }

    #[test]
    fn unknown_status_is_permanent() {
        let err = BotError::UnknownStatus("graded".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Unknown homework status graded");
    }

    #[test]
    fn shape_errors_describe_the_field() {
        assert_eq!(
            BotError::MissingField("homeworks").to_string(),
            "Response is missing the `homeworks` field"
        );
        let err = BotError::WrongType {
            field: "homeworks",
            expected: "a list",
        };
        assert_eq!(err.to_string(), "Field `homeworks` must be a list");
    }

    #[test]
    fn delivery_is_flagged() {
        assert!(BotError::Delivery("chat not found".into()).is_delivery());
        assert!(!BotError::MissingField("homeworks").is_delivery());
    }
}

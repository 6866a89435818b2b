use serde_json::Value;

use crate::error::BotError;

/// One submission as reported by the Practicum API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    pub homework_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Map an API status code onto the known set.
    pub fn parse(code: &str) -> Result<Self, BotError> {
        match code {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(BotError::UnknownStatus(other.to_string())),
        }
    }

    /// Fixed phrase shown to the student for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Shape-checked payload of one poll. Records stay raw until one is rendered.
#[derive(Debug, Clone)]
pub struct ApiAnswer {
    /// Newest first, as the API orders them.
    pub homeworks: Vec<Value>,
    /// Server time to use as the next cursor.
    pub current_date: Option<i64>,
}

//! Validation of Practicum answers and rendering of status messages.

use serde_json::Value;

use crate::error::BotError;
use crate::models::{ApiAnswer, Homework, HomeworkStatus};

/// Check the answer shape and pull out the homework list. Records are not
/// decoded here; only the one that gets announced has to be well formed.
pub fn check_response(response: &Value) -> Result<ApiAnswer, BotError> {
    let object = response.as_object().ok_or(BotError::WrongType {
        field: "response",
        expected: "an object",
    })?;

    let homeworks = object
        .get("homeworks")
        .ok_or(BotError::MissingField("homeworks"))?
        .as_array()
        .ok_or(BotError::WrongType {
            field: "homeworks",
            expected: "a list",
        })?;

    Ok(ApiAnswer {
        homeworks: homeworks.clone(),
        current_date: object.get("current_date").and_then(Value::as_i64),
    })
}

/// Decode a single homework record, reporting the first bad field.
pub fn decode_homework(record: &Value) -> Result<Homework, BotError> {
    let object = record.as_object().ok_or(BotError::WrongType {
        field: "homework",
        expected: "an object",
    })?;

    let text_field = |field: &'static str| -> Result<String, BotError> {
        object
            .get(field)
            .ok_or(BotError::MissingField(field))?
            .as_str()
            .map(str::to_string)
            .ok_or(BotError::WrongType {
                field,
                expected: "a string",
            })
    };

    Ok(Homework {
        homework_name: text_field("homework_name")?,
        status: text_field("status")?,
    })
}

/// Render the chat message for one homework record.
pub fn parse_status(record: &Value) -> Result<String, BotError> {
    let homework = decode_homework(record)?;
    let status = HomeworkStatus::parse(&homework.status)?;

    Ok(format!(
        "Изменился статус проверки работы\"{}\". {}",
        homework.homework_name,
        status.verdict()
    ))
}

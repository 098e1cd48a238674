//! Homework records and their review verdicts.

use std::fmt;

use serde_json::Value;

use crate::error::{ShapeError, TranslateError};

/// Record field holding the homework's name.
pub const NAME_FIELD: &str = "homework_name";

/// Record field holding the review status code.
pub const STATUS_FIELD: &str = "status";

/// Review state of a homework, one per known status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    /// Every known verdict.
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Look up a status code. Unknown codes are an error, never a pass-through.
    pub fn from_code(code: &str) -> Result<Self, TranslateError> {
        match code {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(TranslateError::UnknownStatus(other.to_string())),
        }
    }

    /// The API's status code for this verdict.
    pub fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable sentence sent to the chat.
    pub fn sentence(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentence())
    }
}

/// One homework entry from the status payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub name: String,
    pub status_code: String,
}

impl HomeworkRecord {
    /// Extract name and status from a raw record.
    pub fn from_value(record: &Value) -> Result<Self, ShapeError> {
        let fields = record.as_object().ok_or(ShapeError::RecordNotAMapping)?;

        let field = |key: &'static str| -> Result<String, ShapeError> {
            fields
                .get(key)
                .ok_or(ShapeError::MissingField(key))?
                .as_str()
                .map(str::to_string)
                .ok_or(ShapeError::FieldNotAString(key))
        };

        Ok(Self {
            name: field(NAME_FIELD)?,
            status_code: field(STATUS_FIELD)?,
        })
    }
}

/// Render the "status changed" message for a raw homework record.
///
/// Pure: the same record always yields the same text.
pub fn render_change_message(record: &Value) -> Result<String, TranslateError> {
    let homework = HomeworkRecord::from_value(record)?;
    let verdict = Verdict::from_code(&homework.status_code)?;
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework.name, verdict
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_every_known_status() {
        for verdict in Verdict::ALL {
            let record = json!({"homework_name": "hw_api", "status": verdict.code()});
            let message = render_change_message(&record).unwrap();

            assert!(message.contains("\"hw_api\""));
            assert!(message.ends_with(verdict.sentence()));
        }
    }

    #[test]
    fn test_render_approved_exact_text() {
        let record = json!({"homework_name": "hw1", "status": "approved"});
        assert_eq!(
            render_change_message(&record).unwrap(),
            "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let record = json!({"homework_name": "hw1", "status": "rejected"});
        assert_eq!(
            render_change_message(&record).unwrap(),
            render_change_message(&record).unwrap()
        );
    }

    #[test]
    fn test_unknown_status() {
        let record = json!({"homework_name": "hw1", "status": "lost"});
        assert_eq!(
            render_change_message(&record),
            Err(TranslateError::UnknownStatus("lost".to_string()))
        );
    }

    #[test]
    fn test_missing_fields() {
        let no_name = json!({"status": "approved"});
        assert_eq!(
            render_change_message(&no_name),
            Err(TranslateError::Shape(ShapeError::MissingField(NAME_FIELD)))
        );

        let no_status = json!({"homework_name": "hw1"});
        assert_eq!(
            render_change_message(&no_status),
            Err(TranslateError::Shape(ShapeError::MissingField(STATUS_FIELD)))
        );
    }

    #[test]
    fn test_wrong_field_types() {
        let record = json!({"homework_name": "hw1", "status": 3});
        assert_eq!(
            HomeworkRecord::from_value(&record),
            Err(ShapeError::FieldNotAString(STATUS_FIELD))
        );
        assert_eq!(
            HomeworkRecord::from_value(&json!(["hw1", "approved"])),
            Err(ShapeError::RecordNotAMapping)
        );
    }
}

use serde_json::Value;

/// The fields of one `homeworks` entry the bot reads.
///
/// Built leniently from raw JSON: an absent or null field is `None`, a
/// non-string value keeps its JSON text. Status extraction reports gaps as
/// `MissingName` / `MissingStatus` and odd codes as `UnknownVerdict`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub homework_name: Option<String>,
    pub status: Option<String>,
    pub lesson_name: Option<String>,
    pub reviewer_comment: Option<String>,
    pub date_updated: Option<String>,
}

impl HomeworkRecord {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            homework_name: Some(name.into()),
            status: Some(status.into()),
            ..Default::default()
        }
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<&Value> for HomeworkRecord {
    fn from(value: &Value) -> Self {
        Self {
            homework_name: text_field(value, "homework_name"),
            status: text_field(value, "status"),
            lesson_name: text_field(value, "lesson_name"),
            reviewer_comment: text_field(value, "reviewer_comment"),
            date_updated: text_field(value, "date_updated"),
        }
    }
}

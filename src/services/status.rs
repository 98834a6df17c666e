//! Response validation and status-to-message translation.

use crate::error::{AppError, AppResult, MALFORMED_RESPONSE};
use crate::models::{HomeworkRecord, Verdict};
use serde_json::Value;

/// Mutable state carried from one polling cycle to the next.
///
/// Owned by the poller and never persisted; a restart starts from scratch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Verdict behind the last status-change message
    pub last_verdict: Option<Verdict>,
    /// Unix timestamp sent as `from_date`
    pub cursor: i64,
}

impl PollState {
    pub fn starting_at(cursor: i64) -> Self {
        Self {
            last_verdict: None,
            cursor,
        }
    }

    /// Move the cursor by a fixed step, independent of wall-clock time.
    pub fn advance(&mut self, step_secs: u64) {
        let step = i64::try_from(step_secs).unwrap_or(i64::MAX);
        self.cursor = self.cursor.saturating_add(step);
    }
}

/// Check the shape of a status response and return its homework list as is.
///
/// Only the envelope is checked; entries are read later, newest first. An
/// empty list is valid and simply means there is nothing new.
pub fn check_response(response: &Value) -> AppResult<&[Value]> {
    let body = response
        .as_object()
        .ok_or_else(|| AppError::malformed(MALFORMED_RESPONSE))?;

    let homeworks = match body.get("homeworks") {
        None | Some(Value::Null) => {
            return Err(AppError::malformed(
                "API response does not contain the 'homeworks' key",
            ));
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AppError::malformed(format!(
                "API response 'homeworks' is not a list: {}",
                json_kind(other)
            )));
        }
    };

    if homeworks.is_empty() {
        tracing::debug!("No homework updates in response");
    }

    Ok(homeworks)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turn a homework record into a chat message if its verdict changed.
///
/// Returns `Ok(None)` when the verdict equals the one recorded in `state`.
/// On a change the new verdict is recorded before returning the message.
pub fn parse_status(state: &mut PollState, record: &HomeworkRecord) -> AppResult<Option<String>> {
    let status = record.status.as_deref().ok_or(AppError::MissingStatus)?;
    let name = record.homework_name.as_deref().ok_or(AppError::MissingName)?;
    let verdict: Verdict = status.parse()?;

    if state.last_verdict == Some(verdict) {
        tracing::debug!(homework = name, status, "Homework status unchanged");
        return Ok(None);
    }

    state.last_verdict = Some(verdict);
    Ok(Some(format!(
        "Status changed for \"{}\": {}",
        name,
        verdict.text()
    )))
}

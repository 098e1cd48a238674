//! Shape checks for the status payload.

use serde_json::Value;

use crate::error::ShapeError;

/// Payload key holding the list of homework records.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Payload key holding the server's current timestamp.
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Return the `homeworks` list from a payload.
///
/// Elements are returned as-is; per-record checks happen when a record is
/// rendered.
pub fn extract_homeworks(payload: &Value) -> Result<&[Value], ShapeError> {
    let map = payload.as_object().ok_or(ShapeError::NotAMapping)?;
    map.get(HOMEWORKS_KEY)
        .ok_or(ShapeError::MissingHomeworks)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ShapeError::HomeworksNotAList)
}

/// The server-reported `current_date`, when present and integral.
pub fn current_date(payload: &Value) -> Option<i64> {
    payload.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}

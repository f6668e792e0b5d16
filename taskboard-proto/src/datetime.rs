//! Date-time formats used by the task API and the edit form.
//!
//! The remote service stores due dates as `YYYY-MM-DD HH:mm:ss`. Edit forms
//! bind them as `YYYY-MM-DDTHH:mm` (the HTML `datetime-local` shape). Both
//! are naive local times; no timezone is ever attached.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Format the remote service reads and writes.
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format bound to the edit form's due-date input.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Error returned when a due-date input cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised date-time: {0:?}")]
pub struct DateParseError(pub String);

/// Formats a date-time the way the remote service stores it.
#[must_use]
pub fn format_wire(value: &NaiveDateTime) -> String {
    value.format(WIRE_FORMAT).to_string()
}

/// Formats a date-time for the edit form's input field.
#[must_use]
pub fn format_input(value: &NaiveDateTime) -> String {
    value.format(INPUT_FORMAT).to_string()
}

/// Parses a wire-format date-time. Returns `None` for anything else,
/// including the empty string.
#[must_use]
pub fn parse_wire(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), WIRE_FORMAT).ok()
}

/// Parses user input from a due-date field.
///
/// Accepts the input format with or without seconds, the wire format, and a
/// bare `YYYY-MM-DD` (taken as midnight).
///
/// # Errors
///
/// Returns [`DateParseError`] if the text matches none of those shapes.
pub fn parse_input(raw: &str) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = raw.trim();
    ["%Y-%m-%dT%H:%M:%S", INPUT_FORMAT, WIRE_FORMAT, "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateParseError(raw.to_string()))
}

/// Serde adapter for an optional wire-format due date.
///
/// `None` is written as an empty string. On input, `null`, an empty string,
/// and values that do not parse all read as `None`; the remote service is
/// known to hand back placeholder dates for tasks that never had one.
pub mod wire_opt {
    use super::{Deserialize, Deserializer, NaiveDateTime, Serializer, format_wire, parse_wire};

    /// Serializes `Option<NaiveDateTime>` in [`WIRE_FORMAT`](super::WIRE_FORMAT).
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&format_wire(dt)),
            None => serializer.serialize_str(""),
        }
    }

    /// Deserializes a lenient optional wire date.
    ///
    /// # Errors
    ///
    /// Fails only if the JSON value is neither a string nor `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let parsed = parse_wire(&raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            tracing::debug!(due_date = %raw, "discarding due date outside wire format");
        }
        Ok(parsed)
    }
}

//! Task model as exchanged with the remote task API.
//!
//! The remote service is loosely typed: ids and priorities arrive either as
//! JSON numbers or as numeric strings, and optional text fields may be
//! `null`. Decoding normalises all of that into one representation so the
//! rest of the client can compare values with plain equality.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque task identifier assigned by the remote service.
///
/// Empty until the service has accepted the task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the task has not been created remotely yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(lenient_string(deserializer)?))
    }
}

/// The three priority levels a task can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Ordinal 1.
    Normal,
    /// Ordinal 2.
    Medium,
    /// Ordinal 3.
    High,
}

impl Priority {
    /// All levels, lowest first.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Medium, Self::High];

    /// Numeric ordinal used on the wire.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Maps an ordinal back to a level; anything outside 1..=3 is `None`.
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(Self::Normal),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when text does not name a priority level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid priority: {0:?}")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    /// Accepts the ordinals `"1"`..`"3"` (the drop-target ids used by board
    /// columns) and the level names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let by_ordinal = trimmed.parse::<u8>().ok().and_then(Self::from_ordinal);
        by_ordinal
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|p| p.label().eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}

/// One work item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Remote identifier; empty for drafts.
    #[serde(default)]
    pub id: TaskId,
    /// Task description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    /// Priority ordinal. Only 1, 2 and 3 map to a [`Priority`]; any other
    /// value (0 for unparsable input) is kept but belongs to no bucket.
    #[serde(default, with = "ordinal")]
    pub priority: u8,
    /// Optional due date.
    #[serde(default, with = "crate::datetime::wire_opt")]
    pub due_date: Option<NaiveDateTime>,
    /// Assigned user id; empty when unassigned.
    #[serde(default, deserialize_with = "lenient_string")]
    pub assigned_to: String,
    /// Display name of the assignee. Derived locally, never authoritative.
    #[serde(default, deserialize_with = "lenient_string")]
    pub assigned_name: String,
}

impl Task {
    /// The priority level, if the ordinal is one of the three known ones.
    #[must_use]
    pub const fn level(&self) -> Option<Priority> {
        Priority::from_ordinal(self.priority)
    }

    /// Whether the task has an assignee.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        !self.assigned_to.is_empty()
    }

    /// Returns a copy filed under a different priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority.ordinal();
        self
    }
}

/// A JSON scalar that the service may use where a string is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// Reads a string, number, bool or `null` into a `String` (`null` → empty).
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .unwrap_or_default())
}

/// Serde adapter for the priority ordinal.
///
/// Written as a numeric string, which is what the service itself returns.
mod ordinal {
    use super::{Deserialize, Deserializer, Scalar, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let parsed = match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Int(n)) => u8::try_from(n).ok(),
            Some(Scalar::Text(s)) => s.trim().parse::<u8>().ok(),
            Some(Scalar::Float(_) | Scalar::Bool(_)) | None => None,
        };
        Ok(parsed.unwrap_or(0))
    }
}

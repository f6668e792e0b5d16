//! Users a task can be assigned to.

use serde::{Deserialize, Serialize};

/// A user known to the remote service. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque user id, matched against [`Task::assigned_to`](crate::task::Task::assigned_to).
    #[serde(deserialize_with = "crate::task::lenient_string")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl User {
    /// Creates a user record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Looks up the display name for `assigned_to`.
///
/// Returns an empty string when nobody is assigned or the id is not in
/// `users`.
#[must_use]
pub fn resolve_name(users: &[User], assigned_to: &str) -> String {
    if assigned_to.is_empty() {
        return String::new();
    }
    users
        .iter()
        .find(|u| u.id == assigned_to)
        .map(|u| u.name.clone())
        .unwrap_or_default()
}

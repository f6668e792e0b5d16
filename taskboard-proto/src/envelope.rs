//! Response envelopes for every endpoint of the task API.
//!
//! Every response body is a JSON object with a `status` field. Only the
//! literal `"success"` means the call worked; HTTP status codes alone are
//! not trusted. The per-endpoint payload rides next to `status`:
//!
//! | Endpoint | Payload |
//! |---|---|
//! | `list` | `tasks` |
//! | `listusers` | `users` |
//! | `create` / `update` | `taskid` |
//! | `delete` | none |
//!
//! [`Envelope`] is the raw shape; the `into_*` methods validate it into the
//! typed result of one endpoint.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};
use crate::user::User;

/// Header carrying the static API token.
pub const AUTH_HEADER: &str = "AuthToken";

/// `status` value that marks a successful call.
pub const STATUS_SUCCESS: &str = "success";

/// `status` value the service uses for failures.
pub const STATUS_ERROR: &str = "error";

/// Endpoint paths, relative to the configured base URL.
pub mod endpoint {
    /// `GET`: all tasks.
    pub const LIST_TASKS: &str = "list";
    /// `GET`: all users.
    pub const LIST_USERS: &str = "listusers";
    /// `POST` form: create a task.
    pub const CREATE: &str = "create";
    /// `POST` form: update a task.
    pub const UPDATE: &str = "update";
    /// `POST` form: delete a task.
    pub const DELETE: &str = "delete";
}

/// Errors raised while validating a response envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// `status` was something other than `"success"`.
    #[error("request rejected by service (status {status:?}){}", detail(.error.as_deref()))]
    Rejected {
        /// The `status` value received (empty if the field was missing).
        status: String,
        /// Service-provided reason, if any.
        error: Option<String>,
    },

    /// A successful envelope lacked the payload field for its endpoint.
    #[error("successful response is missing `{0}`")]
    MissingField(&'static str),
}

fn detail(error: Option<&str>) -> String {
    error.map(|e| format!(": {e}")).unwrap_or_default()
}

/// Raw response body shared by all endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// `"success"` on success; anything else is a failure.
    #[serde(default)]
    pub status: String,
    /// Payload of `list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    /// Payload of `listusers`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    /// Payload of `create` and `update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taskid: Option<TaskId>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// A bare success envelope (the `delete` reply).
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            ..Self::default()
        }
    }

    /// Success reply for `list`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Self::success()
        }
    }

    /// Success reply for `listusers`.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Some(users),
            ..Self::success()
        }
    }

    /// Success reply for `create` and `update`.
    #[must_use]
    pub fn with_task_id(id: TaskId) -> Self {
        Self {
            taskid: Some(id),
            ..Self::success()
        }
    }

    /// Failure reply with a reason.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Whether `status` is exactly `"success"`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    fn check(&self) -> Result<(), EnvelopeError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(EnvelopeError::Rejected {
                status: self.status.clone(),
                error: self.error.clone(),
            })
        }
    }

    /// Validates a `list` reply.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Rejected`] on a non-success status,
    /// [`EnvelopeError::MissingField`] if `tasks` is absent.
    pub fn into_tasks(self) -> Result<Vec<Task>, EnvelopeError> {
        self.check()?;
        self.tasks.ok_or(EnvelopeError::MissingField("tasks"))
    }

    /// Validates a `listusers` reply.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Rejected`] on a non-success status,
    /// [`EnvelopeError::MissingField`] if `users` is absent.
    pub fn into_users(self) -> Result<Vec<User>, EnvelopeError> {
        self.check()?;
        self.users.ok_or(EnvelopeError::MissingField("users"))
    }

    /// Validates a `create` reply, which must carry the new id.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Rejected`] on a non-success status,
    /// [`EnvelopeError::MissingField`] if `taskid` is absent or empty.
    pub fn into_created_id(self) -> Result<TaskId, EnvelopeError> {
        self.check()?;
        self.taskid
            .filter(|id| !id.is_empty())
            .ok_or(EnvelopeError::MissingField("taskid"))
    }

    /// Validates an `update` reply. The echoed id is optional.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Rejected`] on a non-success status.
    pub fn into_updated_id(self) -> Result<Option<TaskId>, EnvelopeError> {
        self.check()?;
        Ok(self.taskid.filter(|id| !id.is_empty()))
    }

    /// Validates a `delete` reply.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Rejected`] on a non-success status.
    pub fn into_ack(self) -> Result<(), EnvelopeError> {
        self.check()
    }
}

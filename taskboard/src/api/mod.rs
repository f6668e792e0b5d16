//! Remote task service boundary.
//!
//! Defines the [`TaskApi`] trait the store and form controller talk to.
//! Concrete implementations:
//! - [`http::HttpTaskApi`]: the real service over HTTP (`reqwest`)
//! - [`memory::InMemoryTaskApi`]: in-process double for tests

pub mod http;
pub mod memory;

use std::future::Future;

use taskboard_proto::envelope::EnvelopeError;
use taskboard_proto::task::{Task, TaskId};
use taskboard_proto::user::User;

/// Errors that can occur while calling the task service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body was not a JSON envelope.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope reported failure or lacked its payload.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The configured base URL cannot address the endpoint.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The auth token cannot be sent as an HTTP header value.
    #[error("auth token is not a valid header value: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

/// Async interface to the remote task service.
///
/// Every method performs exactly one request and validates the `status`
/// envelope before returning. No method retries, and none imposes a timeout.
pub trait TaskApi: Send + Sync {
    /// Fetch every task.
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// Fetch every user a task can be assigned to.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    /// Create `task` (its `id` is ignored) and return the id the service
    /// assigned.
    fn create_task(&self, task: &Task) -> impl Future<Output = Result<TaskId, ApiError>> + Send;

    /// Replace the task with `task.id`. Returns the id echoed by the
    /// service, if it sent one.
    fn update_task(
        &self,
        task: &Task,
    ) -> impl Future<Output = Result<Option<TaskId>, ApiError>> + Send;

    /// Delete the task with `id`.
    fn delete_task(&self, id: &TaskId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

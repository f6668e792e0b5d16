//! HTTP implementation of [`TaskApi`].
//!
//! `GET` endpoints return JSON; `POST` endpoints take form-encoded bodies.
//! Every request carries the static `AuthToken` header.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use taskboard_proto::envelope::{AUTH_HEADER, Envelope, endpoint};
use taskboard_proto::form::{CreateTaskForm, DeleteTaskForm, UpdateTaskForm};
use taskboard_proto::task::{Task, TaskId};
use taskboard_proto::user::User;

use super::{ApiError, TaskApi};

/// Talks to the remote task service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpTaskApi {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// `base_url` may be given with or without a trailing slash; endpoint
    /// paths are resolved beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if `base_url` does not parse,
    /// [`ApiError::InvalidToken`] if `auth_token` cannot be sent as a header
    /// value, or [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, auth_token: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut value = HeaderValue::from_str(auth_token)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("authtoken"), value);
        tracing::debug!(header = AUTH_HEADER, %base, "HTTP client configured");

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base })
    }

    /// The base URL endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    async fn get(&self, path: &str) -> Result<Envelope, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        read_envelope(path, response).await
    }

    async fn post<F: Serialize + Sync>(&self, path: &str, form: &F) -> Result<Envelope, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).form(form).send().await?;
        read_envelope(path, response).await
    }
}

/// Reads the body of `response` as an [`Envelope`].
///
/// Non-2xx responses are failures regardless of the body.
async fn read_envelope(path: &str, response: reqwest::Response) -> Result<Envelope, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        tracing::warn!(endpoint = path, status = status.as_u16(), "HTTP error status");
        return Err(ApiError::Status(status.as_u16()));
    }
    let envelope: Envelope = serde_json::from_slice(&body)?;
    if !envelope.is_success() {
        tracing::warn!(
            endpoint = path,
            status = %envelope.status,
            error = envelope.error.as_deref().unwrap_or(""),
            "service rejected request"
        );
    }
    Ok(envelope)
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let tasks = self.get(endpoint::LIST_TASKS).await?.into_tasks()?;
        tracing::info!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users = self.get(endpoint::LIST_USERS).await?.into_users()?;
        tracing::info!(count = users.len(), "fetched users");
        Ok(users)
    }

    async fn create_task(&self, task: &Task) -> Result<TaskId, ApiError> {
        let form = CreateTaskForm::from_task(task);
        let id = self.post(endpoint::CREATE, &form).await?.into_created_id()?;
        tracing::info!(task_id = %id, "created task");
        Ok(id)
    }

    async fn update_task(&self, task: &Task) -> Result<Option<TaskId>, ApiError> {
        let form = UpdateTaskForm::from_task(task);
        let echoed = self.post(endpoint::UPDATE, &form).await?.into_updated_id()?;
        tracing::info!(task_id = %task.id, priority = task.priority, "updated task");
        Ok(echoed)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let form = DeleteTaskForm { taskid: id.clone() };
        self.post(endpoint::DELETE, &form).await?.into_ack()?;
        tracing::info!(task_id = %id, "deleted task");
        Ok(())
    }
}

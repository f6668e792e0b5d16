//! HTTP routes of the mock task API.
//!
//! | Route | Body | Reply |
//! |---|---|---|
//! | `GET /list` | none | `{status, tasks}` |
//! | `GET /listusers` | none | `{status, users}` |
//! | `POST /create` | form | `{status, taskid}` |
//! | `POST /update` | form | `{status, taskid}` |
//! | `POST /delete` | form | `{status}` |
//!
//! Every request must carry the configured `AuthToken` header; otherwise
//! the reply is `401` with an error envelope. Store failures are reported
//! as `200` with `{"status": "error"}`, which is how the hosted service
//! answers.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};

use taskboard_proto::envelope::{AUTH_HEADER, Envelope, endpoint};
use taskboard_proto::form::{CreateTaskForm, DeleteTaskForm, UpdateTaskForm};

use crate::store::TaskStore;

/// Shared server state.
pub struct MockState {
    /// Task and user tables.
    pub store: TaskStore,
    auth_token: String,
}

impl MockState {
    /// Creates state with seeded users that accepts `auth_token`.
    #[must_use]
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self::with_store(auth_token, TaskStore::default())
    }

    /// Creates state around an existing store.
    #[must_use]
    pub fn with_store(auth_token: impl Into<String>, store: TaskStore) -> Self {
        Self {
            store,
            auth_token: auth_token.into(),
        }
    }

    /// Checks the `AuthToken` header.
    #[allow(clippy::result_large_err)]
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let presented = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
        if presented == Some(self.auth_token.as_str()) {
            return Ok(());
        }
        tracing::warn!(present = presented.is_some(), "rejected request with bad auth token");
        Err((
            StatusCode::UNAUTHORIZED,
            Json(Envelope::failure("invalid auth token")),
        )
            .into_response())
    }
}

/// Builds the router over `state`.
pub fn router(state: Arc<MockState>) -> axum::Router {
    axum::Router::new()
        .route(&format!("/{}", endpoint::LIST_TASKS), get(list_tasks))
        .route(&format!("/{}", endpoint::LIST_USERS), get(list_users))
        .route(&format!("/{}", endpoint::CREATE), post(create_task))
        .route(&format!("/{}", endpoint::UPDATE), post(update_task))
        .route(&format!("/{}", endpoint::DELETE), post(delete_task))
        .with_state(state)
}

/// Starts the mock server with a fresh state accepting `auth_token`.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    auth_token: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(MockState::new(auth_token))).await
}

/// Starts the mock server with a pre-built [`MockState`].
///
/// Bind to `127.0.0.1:0` to get an OS-assigned port; the bound address is
/// returned alongside the server task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<MockState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "mock server error");
        }
    });

    Ok((bound_addr, handle))
}

async fn list_tasks(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let tasks = state.store.tasks().await;
    tracing::debug!(count = tasks.len(), "list");
    Json(Envelope::with_tasks(tasks)).into_response()
}

async fn list_users(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    Json(Envelope::with_users(state.store.users().to_vec())).into_response()
}

async fn create_task(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<CreateTaskForm>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let id = state.store.create(form).await;
    tracing::info!(task_id = %id, "created");
    Json(Envelope::with_task_id(id)).into_response()
}

async fn update_task(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<UpdateTaskForm>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let envelope = match state.store.update(form).await {
        Ok(id) => {
            tracing::info!(task_id = %id, "updated");
            Envelope::with_task_id(id)
        }
        Err(e) => {
            tracing::warn!(error = %e, "update failed");
            Envelope::failure(e.to_string())
        }
    };
    Json(envelope).into_response()
}

async fn delete_task(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<DeleteTaskForm>,
) -> Response {
    if let Err(denied) = state.authorize(&headers) {
        return denied;
    }
    let envelope = match state.store.delete(&form.taskid).await {
        Ok(()) => {
            tracing::info!(task_id = %form.taskid, "deleted");
            Envelope::success()
        }
        Err(e) => {
            tracing::warn!(error = %e, "delete failed");
            Envelope::failure(e.to_string())
        }
    };
    Json(envelope).into_response()
}

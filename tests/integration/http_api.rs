//! Integration tests for `HttpTaskApi`.
//!
//! Runs the client against the in-process mock server and against small
//! stub routers that return fixed bodies, validating:
//! - every endpoint round-trips through the mock
//! - the `AuthToken` header and form-encoded bodies are what the service expects
//! - `status != "success"`, HTTP error codes and malformed bodies become errors

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::{get, post};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use taskboard::api::http::HttpTaskApi;
use taskboard::api::{ApiError, TaskApi};
use taskboard_proto::envelope::EnvelopeError;
use taskboard_proto::task::{Task, TaskId};

const TOKEN: &str = "test-token";

/// Start the mock server in-process and return its base URL.
async fn start_mock() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskboard_mock::server::start_server("127.0.0.1:0", TOKEN)
        .await
        .expect("failed to start mock server");
    (format!("http://{addr}"), handle)
}

/// Serve `router` on an OS-assigned port and return its base URL.
async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}

fn draft(message: &str, priority: u8) -> Task {
    Task {
        message: message.to_string(),
        priority,
        ..Task::default()
    }
}

// =============================================================================
// Against the mock server
// =============================================================================

#[tokio::test]
async fn list_users_returns_seeded_users() {
    let (url, _handle) = start_mock().await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    let users = api.list_users().await.unwrap();
    assert_eq!(users, taskboard_mock::store::seed_users());
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let (url, _handle) = start_mock().await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    let mut task = draft("Write report", 2);
    task.assigned_to = "1".to_string();
    task.due_date = NaiveDate::from_ymd_opt(2021, 5, 4).and_then(|d| d.and_hms_opt(10, 0, 0));

    let id = api.create_task(&task).await.unwrap();
    assert!(!id.is_empty());

    let listed = api.list_tasks().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].due_date, task.due_date);
    assert_eq!(listed[0].assigned_name, "Ann Lee");

    let moved = Task {
        id: id.clone(),
        ..task.with_priority(taskboard_proto::task::Priority::High)
    };
    let echoed = api.update_task(&moved).await.unwrap();
    assert_eq!(echoed, Some(id.clone()));
    assert_eq!(api.list_tasks().await.unwrap()[0].priority, 3);

    api.delete_task(&id).await.unwrap();
    assert!(api.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_token_is_http_error() {
    let (url, _handle) = start_mock().await;
    let api = HttpTaskApi::new(&url, "wrong").unwrap();

    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, ApiError::Status(401)), "got {err:?}");
}

#[tokio::test]
async fn unknown_task_is_rejected_by_status() {
    let (url, _handle) = start_mock().await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    let err = api.delete_task(&TaskId::new("missing")).await.unwrap_err();
    match err {
        ApiError::Envelope(EnvelopeError::Rejected { status, error }) => {
            assert_eq!(status, "error");
            assert!(error.unwrap_or_default().contains("missing"));
        }
        other => panic!("expected a rejected envelope, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTaskApi::new(&format!("http://{addr}"), TOKEN).unwrap();
    assert!(matches!(api.list_tasks().await, Err(ApiError::Http(_))));
}

// =============================================================================
// Against stub routers
// =============================================================================

type Seen = Arc<Mutex<Option<(HashMap<String, String>, Option<String>)>>>;

async fn record_create(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Form(body): Form<HashMap<String, String>>,
) -> Json<Value> {
    let token = headers
        .get("AuthToken")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *seen.lock().await = Some((body, token));
    Json(json!({ "status": "success", "taskid": "T9" }))
}

#[tokio::test]
async fn create_sends_form_and_returns_server_id() {
    let seen = Seen::default();
    let router = axum::Router::new()
        .route("/create", post(record_create))
        .with_state(Arc::clone(&seen));
    let url = serve(router).await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    let mut task = draft("Send report", 1);
    task.due_date = NaiveDate::from_ymd_opt(2021, 12, 31).and_then(|d| d.and_hms_opt(23, 5, 0));
    let id = api.create_task(&task).await.unwrap();
    assert_eq!(id.as_str(), "T9");

    let (body, token) = seen.lock().await.take().expect("create was not called");
    assert_eq!(token.as_deref(), Some(TOKEN));
    assert_eq!(body["message"], "Send report");
    assert_eq!(body["priority"], "1");
    assert_eq!(body["assigned_to"], "");
    assert_eq!(body["due_date"], "2021-12-31 23:05:00");
    assert!(!body.contains_key("taskid"));
}

#[tokio::test]
async fn loose_service_json_is_normalised() {
    let router = axum::Router::new().route(
        "/list",
        get(|| async {
            Json(json!({
                "status": "success",
                "tasks": [
                    { "id": 7, "message": "a", "priority": 3, "due_date": null, "assigned_to": 2 },
                    { "id": "8", "message": "b", "priority": "x", "due_date": "", "assigned_to": "" },
                    { "id": "9", "message": "c", "priority": "1", "due_date": "2021-01-01 09:00:00" }
                ]
            }))
        }),
    );
    let url = serve(router).await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    let tasks = api.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].id.as_str(), "7");
    assert_eq!(tasks[0].assigned_to, "2");
    assert_eq!(tasks[1].priority, 0);
    assert!(tasks[1].due_date.is_none());
    assert!(tasks[2].due_date.is_some());
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let router = axum::Router::new().route("/list", get(|| async { "<html>oops</html>" }));
    let url = serve(router).await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    assert!(matches!(api.list_tasks().await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn success_without_payload_is_missing_field() {
    let router = axum::Router::new().route(
        "/create",
        post(|| async { Json(json!({ "status": "success" })) }),
    );
    let url = serve(router).await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    assert!(matches!(
        api.create_task(&draft("x", 1)).await,
        Err(ApiError::Envelope(EnvelopeError::MissingField(_)))
    ));
}

#[tokio::test]
async fn update_reply_without_id_is_accepted() {
    let router = axum::Router::new().route(
        "/update",
        post(|| async { Json(json!({ "status": "success" })) }),
    );
    let url = serve(router).await;
    let api = HttpTaskApi::new(&url, TOKEN).unwrap();

    let task = Task {
        id: TaskId::new("5"),
        ..draft("x", 2)
    };
    assert_eq!(api.update_task(&task).await.unwrap(), None);
}

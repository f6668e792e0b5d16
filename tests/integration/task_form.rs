//! Integration tests for `TaskFormController`.
//!
//! These tests validate:
//! - add and edit sessions against the mock server, merged into the store
//! - required-field validation never reaches the service
//! - a rejected submission leaves the session open for retry

use std::sync::Arc;

use chrono::NaiveDate;

use taskboard::api::memory::{ApiCall, InMemoryTaskApi};
use taskboard::api::http::HttpTaskApi;
use taskboard::api::TaskApi;
use taskboard::tasks::{FormAction, FormError, Notice, TaskFormController, TaskListStore};
use taskboard_mock::server::{self, MockState};
use taskboard_proto::task::Priority;

const TOKEN: &str = "form-token";

async fn start() -> (HttpTaskApi, Arc<MockState>) {
    let state = Arc::new(MockState::new(TOKEN));
    let (addr, _handle) = server::start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start mock server");
    (
        HttpTaskApi::new(&format!("http://{addr}"), TOKEN).unwrap(),
        state,
    )
}

#[tokio::test]
async fn add_session_creates_and_merges() {
    let (api, state) = start().await;
    let mut store = TaskListStore::new();

    let mut form = TaskFormController::initialize(None);
    form.load_users(&api).await;
    assert_eq!(form.users().len(), 3);

    let fields = form.fields_mut();
    fields.message = "Send report".to_string();
    fields.priority = Some(Priority::High);
    fields.assigned_to = "3".to_string();
    fields.due_date = "2021-07-08T09:10".to_string();

    let outcome = form.submit(&api).await.unwrap();
    assert_eq!(outcome.action, FormAction::Add);
    assert_eq!(outcome.action.as_str(), "add");
    assert!(!outcome.task.id.is_empty());
    assert_eq!(outcome.task.assigned_name, "Cara Diaz");

    let remote = state.store.tasks().await;
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].id, outcome.task.id);
    assert_eq!(
        remote[0].due_date,
        NaiveDate::from_ymd_opt(2021, 7, 8).and_then(|d| d.and_hms_opt(9, 10, 0))
    );

    assert_eq!(store.apply_form_outcome(outcome), Notice::Added);
    assert_eq!(store.bucket(Priority::High).len(), 1);
}

#[tokio::test]
async fn edit_session_replaces_task_at_end_of_bucket() {
    let (api, _state) = start().await;
    let mut store = TaskListStore::new();
    for message in ["first", "second"] {
        let mut form = TaskFormController::initialize(None);
        form.fields_mut().message = message.to_string();
        form.fields_mut().priority = Some(Priority::Normal);
        let outcome = form.submit(&api).await.unwrap();
        store.apply_form_outcome(outcome);
    }

    let first = store.bucket(Priority::Normal)[0].clone();
    let mut form = TaskFormController::initialize(Some(&first));
    form.fields_mut().message = "first, edited".to_string();
    let outcome = form.submit(&api).await.unwrap();
    assert_eq!(outcome.action, FormAction::Edit);
    assert_eq!(outcome.task.id, first.id);

    assert_eq!(store.apply_form_outcome(outcome), Notice::Edited);
    let normal: Vec<_> = store
        .bucket(Priority::Normal)
        .iter()
        .map(|t| t.message.as_str())
        .collect();
    assert_eq!(normal, ["second", "first, edited"]);
    assert_eq!(
        store.tasks().iter().filter(|t| t.id == first.id).count(),
        1
    );

    // The service agrees.
    let remote = api.list_tasks().await.unwrap();
    assert!(remote.iter().any(|t| t.message == "first, edited"));
}

#[tokio::test]
async fn empty_message_never_calls_create() {
    let api = InMemoryTaskApi::new();
    let mut form = TaskFormController::initialize(None);
    form.fields_mut().priority = Some(Priority::Medium);

    let err = form.submit(&api).await.unwrap_err();
    assert!(matches!(err, FormError::MissingFields(_)));
    assert_eq!(err.notice(), Notice::MissingFields);
    assert_eq!(err.notice().text(), "Fill mandatory fields");
    assert!(!api.calls().iter().any(|c| matches!(c, ApiCall::Create(_))));
}

#[tokio::test]
async fn rejected_edit_can_be_retried() {
    let (api, state) = start().await;
    let mut form = TaskFormController::initialize(None);
    form.fields_mut().message = "x".to_string();
    form.fields_mut().priority = Some(Priority::Normal);
    let created = form.submit(&api).await.unwrap().task;

    let mut edit = TaskFormController::initialize(Some(&created));
    edit.fields_mut().message = "y".to_string();

    state.store.seed(Vec::new()).await;
    let err = edit.submit(&api).await.unwrap_err();
    assert_eq!(err.notice(), Notice::Failed);

    // Put the task back and resubmit the same session.
    state.store.seed(vec![created]).await;
    let outcome = edit.submit(&api).await.unwrap();
    assert_eq!(outcome.task.message, "y");
}

#[tokio::test]
async fn user_list_failure_resolves_empty_names() {
    let (api, _state) = start().await;
    let locked_out = HttpTaskApi::new(api.base_url().as_str(), "nope").unwrap();

    let mut form = TaskFormController::initialize(None);
    form.load_users(&locked_out).await;
    assert!(form.users().is_empty());

    form.fields_mut().message = "x".to_string();
    form.fields_mut().priority = Some(Priority::Normal);
    form.fields_mut().assigned_to = "1".to_string();
    let outcome = form.submit(&api).await.unwrap();
    assert_eq!(outcome.task.assigned_name, "");
    assert_eq!(outcome.task.assigned_to, "1");
}

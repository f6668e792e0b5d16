//! Integration tests for `TaskListStore` driven through the HTTP client and
//! the in-process mock server.
//!
//! These tests validate:
//! - `load` replaces the canonical list and re-buckets it
//! - a failed `load` keeps what was on the board
//! - `delete` removes remotely and locally
//! - drag-and-drop between buckets commits locally and updates the service
//! - filter and search work on loaded data

use std::sync::Arc;

use taskboard::api::TaskApi;
use taskboard::api::http::HttpTaskApi;
use taskboard::tasks::{Notice, TaskListStore};
use taskboard_mock::server::{self, MockState};
use taskboard_proto::task::{Priority, Task, TaskId};

const TOKEN: &str = "board-token";

fn task(message: &str, priority: u8) -> Task {
    Task {
        message: message.to_string(),
        priority,
        ..Task::default()
    }
}

/// Start a mock server, seed it through the API, and return a client.
async fn seeded(tasks: &[Task]) -> (HttpTaskApi, Arc<MockState>) {
    let state = Arc::new(MockState::new(TOKEN));
    let (addr, _handle) = server::start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start mock server");
    let api = HttpTaskApi::new(&format!("http://{addr}"), TOKEN).unwrap();
    for t in tasks {
        api.create_task(t).await.unwrap();
    }
    (api, state)
}

fn messages(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.message.as_str()).collect()
}

#[tokio::test]
async fn load_fills_buckets() {
    let (api, _state) = seeded(&[task("a", 1), task("b", 3), task("c", 1), task("d", 9)]).await;
    let mut store = TaskListStore::new();

    assert!(store.load(&api).await.is_none());
    assert!(!store.is_loading());
    assert_eq!(store.tasks().len(), 4);
    assert_eq!(messages(store.bucket(Priority::Normal)), ["a", "c"]);
    assert_eq!(messages(store.bucket(Priority::High)), ["b"]);
    assert_eq!(store.buckets().len(), 3, "priority 9 fits no bucket");
}

#[tokio::test]
async fn failed_load_keeps_board() {
    let (api, _state) = seeded(&[task("a", 1)]).await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    let locked_out = HttpTaskApi::new(api.base_url().as_str(), "nope").unwrap();
    let notice = store.load(&locked_out).await;
    assert_eq!(notice, Some(Notice::Failed));
    assert_eq!(messages(store.bucket(Priority::Normal)), ["a"]);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn delete_removes_everywhere() {
    let (api, state) = seeded(&[task("a", 1), task("b", 2)]).await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    let id = store.bucket(Priority::Normal)[0].id.clone();
    assert_eq!(store.delete(&api, &id).await, Notice::Deleted);
    assert!(store.find(&id).is_none());
    assert_eq!(state.store.tasks().await.len(), 1);

    // Deleting again fails remotely and changes nothing.
    assert_eq!(store.delete(&api, &id).await, Notice::Failed);
    assert_eq!(store.tasks().len(), 1);
}

#[tokio::test]
async fn drag_between_buckets_updates_service() {
    let (api, state) = seeded(&[task("a", 1), task("b", 2)]).await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    let notice = store
        .move_between_buckets(&api, Priority::Normal, Priority::Medium, 0, 0)
        .await
        .unwrap();
    assert_eq!(notice, Notice::PriorityUpdated);
    assert_eq!(messages(store.bucket(Priority::Medium)), ["a", "b"]);

    let remote = state.store.tasks().await;
    let a = remote.iter().find(|t| t.message == "a").unwrap();
    assert_eq!(a.priority, 2);
}

#[tokio::test]
async fn drag_is_kept_when_service_refuses() {
    let (api, state) = seeded(&[task("a", 1)]).await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    // The service forgets the task, so the update is rejected.
    state.store.seed(Vec::new()).await;
    let notice = store
        .move_between_buckets(&api, Priority::Normal, Priority::High, 0, 0)
        .await
        .unwrap();
    assert_eq!(notice, Notice::Failed);
    assert_eq!(messages(store.bucket(Priority::High)), ["a"]);
}

#[tokio::test]
async fn filter_by_priority_two() {
    let (api, _state) = seeded(&[task("one", 1), task("two-a", 2), task("two-b", 2)]).await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    store.filter(Some("2".parse().unwrap()), None);
    let shown: Vec<_> = store.buckets().iter().flat_map(|(_, b)| messages(b)).collect();
    assert_eq!(shown, ["two-a", "two-b"]);
}

#[tokio::test]
async fn search_report_ignores_case() {
    let (api, _state) = seeded(&[
        task("Send report", 1),
        task("Call client", 1),
        task("REPORT status", 1),
    ])
    .await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    store.search("report");
    assert_eq!(
        messages(store.bucket(Priority::Normal)),
        ["Send report", "REPORT status"]
    );
    assert_eq!(store.tasks().len(), 3);
}

#[tokio::test]
async fn removed_id_is_never_bucketed() {
    let (api, _state) = seeded(&[task("a", 1), task("b", 1)]).await;
    let mut store = TaskListStore::new();
    store.load(&api).await;

    let id: TaskId = store.tasks()[0].id.clone();
    store.remove(&id);
    assert!(
        store
            .buckets()
            .iter()
            .all(|(_, bucket)| bucket.iter().all(|t| t.id != id))
    );
}

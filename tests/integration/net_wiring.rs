//! Integration tests for the network worker.
//!
//! Tests that `spawn_net` runs `TaskApi` calls off the caller's loop and
//! reports each completion as a `NetEvent`, against the in-process mock:
//! - load, submit, delete and priority-change commands round-trip
//! - failures are delivered as events, not dropped
//! - `Shutdown` stops the command handler

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use taskboard::api::http::HttpTaskApi;
use taskboard::app::App;
use taskboard::net::{self, NetCommand, NetEvent};
use taskboard::tasks::{Notice, TaskFormController};
use taskboard_proto::task::{Priority, TaskId};

const TOKEN: &str = "net-token";

async fn start() -> HttpTaskApi {
    let (addr, _handle) = taskboard_mock::server::start_server("127.0.0.1:0", TOKEN)
        .await
        .expect("failed to start mock server");
    HttpTaskApi::new(&format!("http://{addr}"), TOKEN).unwrap()
}

async fn next_event(rx: &mut mpsc::Receiver<NetEvent>) -> NetEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timeout waiting for net event")
        .expect("event channel closed unexpectedly")
}

#[tokio::test]
async fn load_tasks_reports_result() {
    let (cmd_tx, mut evt_rx) = net::spawn_net(Arc::new(start().await), 8);

    cmd_tx.send(NetCommand::LoadTasks).await.unwrap();
    match next_event(&mut evt_rx).await {
        NetEvent::TasksLoaded(Ok(tasks)) => assert!(tasks.is_empty()),
        other => panic!("expected TasksLoaded, got: {other:?}"),
    }
}

#[tokio::test]
async fn submit_then_delete_round_trip() {
    let (cmd_tx, mut evt_rx) = net::spawn_net(Arc::new(start().await), 8);

    let mut form = TaskFormController::initialize(None);
    form.fields_mut().message = "ship".to_string();
    form.fields_mut().priority = Some(Priority::Medium);
    cmd_tx
        .send(NetCommand::Submit(form.prepare().unwrap()))
        .await
        .unwrap();

    let NetEvent::Submitted { request, result } = next_event(&mut evt_rx).await else {
        panic!("expected Submitted");
    };
    let outcome = TaskFormController::complete(request, result).unwrap();
    let id = outcome.task.id.clone();

    cmd_tx
        .send(NetCommand::ChangePriority(
            outcome.task.with_priority(Priority::High),
        ))
        .await
        .unwrap();
    match next_event(&mut evt_rx).await {
        NetEvent::PriorityChanged { task_id, result } => {
            assert_eq!(task_id, id);
            assert!(result.is_ok());
        }
        other => panic!("expected PriorityChanged, got: {other:?}"),
    }

    cmd_tx.send(NetCommand::Delete(id.clone())).await.unwrap();
    match next_event(&mut evt_rx).await {
        NetEvent::Deleted { id: deleted, result } => {
            assert_eq!(deleted, id);
            assert!(result.is_ok());
        }
        other => panic!("expected Deleted, got: {other:?}"),
    }
}

#[tokio::test]
async fn failures_arrive_as_events() {
    let (cmd_tx, mut evt_rx) = net::spawn_net(Arc::new(start().await), 8);

    cmd_tx
        .send(NetCommand::Delete(TaskId::new("ghost")))
        .await
        .unwrap();
    match next_event(&mut evt_rx).await {
        NetEvent::Deleted { result, .. } => assert!(result.is_err()),
        other => panic!("expected Deleted, got: {other:?}"),
    }
}

#[tokio::test]
async fn app_applies_worker_events() {
    let (cmd_tx, mut evt_rx) = net::spawn_net(Arc::new(start().await), 8);
    let mut app = App::new();

    // Initial load, then a form submission completed by the worker.
    let cmd = app.request_load();
    cmd_tx.send(cmd).await.unwrap();
    app.apply_net_event(next_event(&mut evt_rx).await);
    assert!(!app.store.is_loading());

    app.form = Some(TaskFormController::initialize(None));
    if let Some(form) = app.form.as_mut() {
        form.fields_mut().message = "from app".to_string();
        form.fields_mut().priority = Some(Priority::Normal);
    }
    let request = app
        .form
        .as_ref()
        .map(TaskFormController::prepare)
        .and_then(Result::ok)
        .expect("form should validate");
    cmd_tx.send(NetCommand::Submit(request)).await.unwrap();
    app.apply_net_event(next_event(&mut evt_rx).await);

    assert!(app.form.is_none());
    assert_eq!(app.notice.map(|(n, _)| n), Some(Notice::Added));
    assert_eq!(app.store.bucket(Priority::Normal).len(), 1);
}

#[tokio::test]
async fn shutdown_stops_handler() {
    let (cmd_tx, _evt_rx) = net::spawn_net(Arc::new(start().await), 8);

    cmd_tx.send(NetCommand::Shutdown).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), cmd_tx.closed())
        .await
        .expect("handler did not stop");
}

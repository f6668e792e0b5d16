//! Network worker bridging the TUI loop to the task service.
//!
//! The terminal loop is synchronous (crossterm polling). It hands
//! [`NetCommand`]s to a background tokio task and drains [`NetEvent`]s on
//! every tick:
//!
//! ```text
//! TUI (main thread)  ←── NetEvent ───  tokio background tasks
//!                     ─── NetCommand →
//! ```
//!
//! Each command runs as its own tokio task, so completions may arrive in
//! any order. Nothing is de-duplicated, cancelled or timed out.

use std::sync::Arc;

use tokio::sync::mpsc;

use taskboard_proto::task::{Task, TaskId};
use taskboard_proto::user::User;

use crate::api::{ApiError, TaskApi};
use crate::tasks::SubmitRequest;

/// Default channel capacity for commands and events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Requests from the TUI loop.
#[derive(Debug)]
pub enum NetCommand {
    /// Fetch the task list.
    LoadTasks,
    /// Fetch the user list for an open form.
    LoadUsers,
    /// Send a validated form submission.
    Submit(SubmitRequest),
    /// Delete a task.
    Delete(TaskId),
    /// Send a task whose priority was changed by a drag between columns.
    ChangePriority(Task),
    /// Stop accepting commands.
    Shutdown,
}

/// Completions delivered back to the TUI loop.
#[derive(Debug)]
pub enum NetEvent {
    /// Result of [`NetCommand::LoadTasks`].
    TasksLoaded(Result<Vec<Task>, ApiError>),
    /// Result of [`NetCommand::LoadUsers`].
    UsersLoaded(Result<Vec<User>, ApiError>),
    /// Result of [`NetCommand::Submit`].
    Submitted {
        /// The request that was sent.
        request: SubmitRequest,
        /// The id the task ended up with.
        result: Result<TaskId, ApiError>,
    },
    /// Result of [`NetCommand::Delete`].
    Deleted {
        /// The task that was deleted.
        id: TaskId,
        /// Service outcome.
        result: Result<(), ApiError>,
    },
    /// Result of [`NetCommand::ChangePriority`].
    PriorityChanged {
        /// The task that was moved.
        task_id: TaskId,
        /// Service outcome.
        result: Result<(), ApiError>,
    },
}

/// Spawns the command handler and returns its channel handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_net<A>(
    api: Arc<A>,
    capacity: usize,
) -> (mpsc::Sender<NetCommand>, mpsc::Receiver<NetEvent>)
where
    A: TaskApi + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<NetCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<NetEvent>(capacity);
    tokio::spawn(command_handler(api, cmd_rx, evt_tx));
    (cmd_tx, evt_rx)
}

/// Background task: dispatch commands until shutdown or until the TUI
/// drops its sender.
async fn command_handler<A>(
    api: Arc<A>,
    mut cmd_rx: mpsc::Receiver<NetCommand>,
    evt_tx: mpsc::Sender<NetEvent>,
) where
    A: TaskApi + 'static,
{
    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, NetCommand::Shutdown) {
            tracing::info!("net command handler shutting down");
            break;
        }
        tracing::debug!(?cmd, "dispatching");
        let api = Arc::clone(&api);
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            let Some(event) = execute(api.as_ref(), cmd).await else {
                return;
            };
            if evt_tx.send(event).await.is_err() {
                tracing::debug!("event receiver dropped");
            }
        });
    }
}

/// Runs one command against `api`.
async fn execute<A: TaskApi>(api: &A, cmd: NetCommand) -> Option<NetEvent> {
    let event = match cmd {
        NetCommand::LoadTasks => NetEvent::TasksLoaded(api.list_tasks().await),
        NetCommand::LoadUsers => NetEvent::UsersLoaded(api.list_users().await),
        NetCommand::Submit(request) => {
            let result = request.send(api).await;
            NetEvent::Submitted { request, result }
        }
        NetCommand::Delete(id) => {
            let result = api.delete_task(&id).await;
            NetEvent::Deleted { id, result }
        }
        NetCommand::ChangePriority(task) => {
            let result = api.update_task(&task).await.map(|_| ());
            NetEvent::PriorityChanged {
                task_id: task.id,
                result,
            }
        }
        NetCommand::Shutdown => return None,
    };
    Some(event)
}

//! In-process [`TaskApi`] for tests.
//!
//! Keeps tasks and users in memory, records every call it receives, and can
//! be switched into a mode where the service rejects every request the way
//! the real one does (`{"status": "error"}`).

use parking_lot::Mutex;

use taskboard_proto::envelope::{EnvelopeError, STATUS_ERROR};
use taskboard_proto::task::{Task, TaskId};
use taskboard_proto::user::User;

use super::{ApiError, TaskApi};

/// A request received by [`InMemoryTaskApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `list`
    ListTasks,
    /// `listusers`
    ListUsers,
    /// `create` with the submitted task.
    Create(Task),
    /// `update` with the submitted task.
    Update(Task),
    /// `delete` with the submitted id.
    Delete(TaskId),
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    users: Vec<User>,
    next_id: u64,
    rejecting: bool,
    calls: Vec<ApiCall>,
}

/// Task service double backed by a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct InMemoryTaskApi {
    state: Mutex<State>,
}

impl InMemoryTaskApi {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the task list.
    #[must_use]
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.state.lock().tasks = tasks;
        self
    }

    /// Seeds the user list.
    #[must_use]
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state.lock().users = users;
        self
    }

    /// When `true`, every subsequent call answers with an error status.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.state.lock().rejecting = rejecting;
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    /// Snapshot of the stored tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Records `call` and fails if the service is rejecting.
    fn enter(state: &mut State, call: ApiCall) -> Result<(), ApiError> {
        state.calls.push(call);
        if state.rejecting {
            return Err(EnvelopeError::Rejected {
                status: STATUS_ERROR.to_string(),
                error: Some("rejected by test double".to_string()),
            }
            .into());
        }
        Ok(())
    }
}

impl TaskApi for InMemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, ApiCall::ListTasks)?;
        Ok(state.tasks.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, ApiCall::ListUsers)?;
        Ok(state.users.clone())
    }

    async fn create_task(&self, task: &Task) -> Result<TaskId, ApiError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, ApiCall::Create(task.clone()))?;
        state.next_id += 1;
        let id = TaskId::new(format!("mem-{}", state.next_id));
        state.tasks.push(Task {
            id: id.clone(),
            ..task.clone()
        });
        Ok(id)
    }

    async fn update_task(&self, task: &Task) -> Result<Option<TaskId>, ApiError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, ApiCall::Update(task.clone()))?;
        match state.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(Some(task.id.clone()))
            }
            None => Err(EnvelopeError::Rejected {
                status: STATUS_ERROR.to_string(),
                error: Some(format!("no task {}", task.id)),
            }
            .into()),
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, ApiCall::Delete(id.clone()))?;
        state.tasks.retain(|t| &t.id != id);
        Ok(())
    }
}

//! In-memory task and user tables.

use taskboard_proto::datetime::parse_wire;
use taskboard_proto::form::{CreateTaskForm, UpdateTaskForm};
use taskboard_proto::task::{Task, TaskId};
use taskboard_proto::user::{User, resolve_name};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors returned by store operations. Reported to clients as
/// `{"status": "error", "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// No task has the given id.
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
}

/// Users every fresh store starts with.
#[must_use]
pub fn seed_users() -> Vec<User> {
    vec![
        User::new("1", "Ann Lee"),
        User::new("2", "Bob Stone"),
        User::new("3", "Cara Diaz"),
    ]
}

/// Task list plus a fixed user list.
///
/// Thread-safe via [`RwLock`]. Users are read-only.
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
    users: Vec<User>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(seed_users())
    }
}

impl TaskStore {
    /// Creates an empty task table with the given users.
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            users,
        }
    }

    /// Replaces the task table.
    pub async fn seed(&self, tasks: Vec<Task>) {
        *self.tasks.write().await = tasks;
    }

    /// All tasks in insertion order.
    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// All users.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Stores a new task and returns its fresh id.
    pub async fn create(&self, form: CreateTaskForm) -> TaskId {
        let id = TaskId::new(Uuid::now_v7().to_string());
        let task = self.to_task(id.clone(), form);
        self.tasks.write().await.push(task);
        id
    }

    /// Replaces the task named by `form.taskid`.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::UnknownTask`] if there is no such task.
    pub async fn update(&self, form: UpdateTaskForm) -> Result<TaskId, MockError> {
        let id = form.taskid.clone();
        let task = self.to_task(
            id.clone(),
            CreateTaskForm {
                message: form.message,
                priority: form.priority,
                assigned_to: form.assigned_to,
                due_date: form.due_date,
            },
        );
        let mut tasks = self.tasks.write().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| MockError::UnknownTask(id.clone()))?;
        *slot = task;
        drop(tasks);
        Ok(id)
    }

    /// Removes the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::UnknownTask`] if there is no such task.
    pub async fn delete(&self, id: &TaskId) -> Result<(), MockError> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| MockError::UnknownTask(id.clone()))?;
        tasks.remove(index);
        drop(tasks);
        Ok(())
    }

    /// Builds the stored record. Unreadable priorities are kept as 0 and
    /// unreadable dates as "no due date", as the wire decoder does.
    fn to_task(&self, id: TaskId, form: CreateTaskForm) -> Task {
        let assigned_name = resolve_name(&self.users, &form.assigned_to);
        Task {
            id,
            message: form.message,
            priority: form.priority.trim().parse().unwrap_or(0),
            due_date: parse_wire(&form.due_date),
            assigned_to: form.assigned_to,
            assigned_name,
        }
    }
}

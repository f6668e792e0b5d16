//! Form-encoded request bodies for the mutating endpoints.

use serde::{Deserialize, Serialize};

use crate::datetime::format_wire;
use crate::task::{Task, TaskId};

/// Body of `POST create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskForm {
    /// Task description.
    pub message: String,
    /// Priority ordinal as text.
    pub priority: String,
    /// Assignee id, empty when unassigned.
    #[serde(default)]
    pub assigned_to: String,
    /// Due date in wire format, empty when unset.
    #[serde(default)]
    pub due_date: String,
}

impl CreateTaskForm {
    /// Builds the body from a draft task; `id` and `assigned_name` are not sent.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            message: task.message.clone(),
            priority: task.priority.to_string(),
            assigned_to: task.assigned_to.clone(),
            due_date: task.due_date.as_ref().map(format_wire).unwrap_or_default(),
        }
    }
}

/// Body of `POST update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskForm {
    /// Id of the task being replaced.
    pub taskid: TaskId,
    /// Task description.
    pub message: String,
    /// Priority ordinal as text.
    pub priority: String,
    /// Assignee id, empty when unassigned.
    #[serde(default)]
    pub assigned_to: String,
    /// Due date in wire format, empty when unset.
    #[serde(default)]
    pub due_date: String,
}

impl UpdateTaskForm {
    /// Builds the body from a task that already has an id.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        let fields = CreateTaskForm::from_task(task);
        Self {
            taskid: task.id.clone(),
            message: fields.message,
            priority: fields.priority,
            assigned_to: fields.assigned_to,
            due_date: fields.due_date,
        }
    }
}

/// Body of `POST delete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskForm {
    /// Id of the task to delete.
    pub taskid: TaskId,
}

//! One add/edit form session.

use taskboard_proto::datetime::{DateParseError, format_input, parse_input};
use taskboard_proto::task::{Priority, Task, TaskId};
use taskboard_proto::user::{User, resolve_name};

use super::notice::Notice;
use crate::api::{ApiError, TaskApi};

/// Whether the session creates a task or edits one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// A new task.
    Add,
    /// The task with this id.
    Edit(TaskId),
}

/// Raw field values as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Task description. Required.
    pub message: String,
    /// Due date in input format, or empty.
    pub due_date: String,
    /// Selected priority. Required.
    pub priority: Option<Priority>,
    /// Selected user id, or empty for unassigned.
    pub assigned_to: String,
}

/// Tag attached to a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// The task was created.
    Add,
    /// The task was updated.
    Edit,
}

impl FormAction {
    /// Wire-style name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
        }
    }
}

/// A reconciled task ready to be merged into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    /// Which path produced the task.
    pub action: FormAction,
    /// The task with its server-confirmed id.
    pub task: Task,
}

/// A validated remote call produced by [`TaskFormController::prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    /// Create this task; its id is empty until the service assigns one.
    Create(Task),
    /// Replace the task with the same id.
    Update(Task),
}

impl SubmitRequest {
    /// The task carried by the request.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::Create(task) | Self::Update(task) => task,
        }
    }

    /// The action tag the outcome will carry.
    #[must_use]
    pub const fn action(&self) -> FormAction {
        match self {
            Self::Create(_) => FormAction::Add,
            Self::Update(_) => FormAction::Edit,
        }
    }

    /// Sends the request and returns the id the task ends up with.
    ///
    /// An update reply without an id keeps the id that was sent.
    ///
    /// # Errors
    ///
    /// Returns whatever the service call returned.
    pub async fn send<A: TaskApi>(&self, api: &A) -> Result<TaskId, ApiError> {
        match self {
            Self::Create(task) => api.create_task(task).await,
            Self::Update(task) => Ok(api
                .update_task(task)
                .await?
                .unwrap_or_else(|| task.id.clone())),
        }
    }
}

/// Why a submission did not produce an outcome.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Required fields were left empty. No request was sent.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The due date could not be read. No request was sent.
    #[error(transparent)]
    InvalidDueDate(#[from] DateParseError),

    /// The service call failed.
    #[error("submit failed: {0}")]
    Remote(#[from] ApiError),
}

impl FormError {
    /// The notice to raise for this error.
    #[must_use]
    pub const fn notice(&self) -> Notice {
        match self {
            Self::MissingFields(_) => Notice::MissingFields,
            Self::InvalidDueDate(_) => Notice::InvalidDate,
            Self::Remote(_) => Notice::Failed,
        }
    }
}

/// State of one open add/edit form.
///
/// The controller never talks to the store. A successful session yields a
/// [`FormOutcome`] that the caller hands to
/// [`TaskListStore::apply_form_outcome`](super::TaskListStore::apply_form_outcome).
/// A failed submission leaves the controller untouched so it can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFormController {
    mode: FormMode,
    fields: FormFields,
    users: Vec<User>,
}

impl TaskFormController {
    /// Opens a session: edit mode pre-filled from `existing`, otherwise add
    /// mode with empty fields.
    #[must_use]
    pub fn initialize(existing: Option<&Task>) -> Self {
        let (mode, fields) = match existing {
            Some(task) => (
                FormMode::Edit(task.id.clone()),
                FormFields {
                    message: task.message.clone(),
                    due_date: task.due_date.as_ref().map(format_input).unwrap_or_default(),
                    priority: task.level(),
                    assigned_to: task.assigned_to.clone(),
                },
            ),
            None => (FormMode::Add, FormFields::default()),
        };
        Self {
            mode,
            fields,
            users: Vec::new(),
        }
    }

    /// Add or edit.
    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Current field values.
    #[must_use]
    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Mutable field values, for editing.
    pub const fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Users the task can be assigned to.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Display name of the selected assignee, empty if none or unknown.
    #[must_use]
    pub fn assignee_name(&self) -> String {
        resolve_name(&self.users, &self.fields.assigned_to)
    }

    /// Stores the result of a user-list fetch. A failure leaves the list
    /// empty.
    pub fn set_users(&mut self, result: Result<Vec<User>, ApiError>) {
        match result {
            Ok(users) => {
                tracing::debug!(count = users.len(), "users loaded");
                self.users = users;
            }
            Err(e) => {
                tracing::warn!(error = %e, "user list load failed");
                self.users.clear();
            }
        }
    }

    /// Fetches the user list from `api`.
    pub async fn load_users<A: TaskApi>(&mut self, api: &A) {
        let result = api.list_users().await;
        self.set_users(result);
    }

    /// Validates the fields and builds the remote call.
    ///
    /// # Errors
    ///
    /// [`FormError::MissingFields`] when the message is empty or no priority
    /// is selected, [`FormError::InvalidDueDate`] when a non-empty due date
    /// cannot be parsed.
    pub fn prepare(&self) -> Result<SubmitRequest, FormError> {
        let mut missing = Vec::new();
        if self.fields.message.is_empty() {
            missing.push("message");
        }
        let Some(priority) = self.fields.priority else {
            missing.push("priority");
            return Err(FormError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        let due_date = match self.fields.due_date.trim() {
            "" => None,
            raw => Some(parse_input(raw)?),
        };
        let mut task = Task {
            id: TaskId::default(),
            message: self.fields.message.clone(),
            priority: priority.ordinal(),
            due_date,
            assigned_to: self.fields.assigned_to.clone(),
            assigned_name: self.assignee_name(),
        };

        Ok(match &self.mode {
            FormMode::Add => SubmitRequest::Create(task),
            FormMode::Edit(id) => {
                task.id = id.clone();
                SubmitRequest::Update(task)
            }
        })
    }

    /// Combines a sent request with the service reply.
    ///
    /// # Errors
    ///
    /// [`FormError::Remote`] if the call failed.
    pub fn complete(
        request: SubmitRequest,
        result: Result<TaskId, ApiError>,
    ) -> Result<FormOutcome, FormError> {
        let id = result?;
        let action = request.action();
        let (SubmitRequest::Create(mut task) | SubmitRequest::Update(mut task)) = request;
        task.id = id;
        tracing::info!(task_id = %task.id, action = action.as_str(), "form submitted");
        Ok(FormOutcome { action, task })
    }

    /// Validates, sends and reconciles in one go.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare) and [`complete`](Self::complete).
    pub async fn submit<A: TaskApi>(&self, api: &A) -> Result<FormOutcome, FormError> {
        let request = self.prepare()?;
        let result = request.send(api).await;
        Self::complete(request, result)
    }

    // -- Field editing -----------------------------------------------------

    /// Steps the priority selection through Normal, Medium and High.
    pub fn cycle_priority(&mut self, forward: bool) {
        let all = Priority::ALL;
        let next = match self.fields.priority {
            None if forward => all[0],
            None => all[all.len() - 1],
            Some(p) => {
                let i = usize::from(p.ordinal() - 1);
                let i = if forward {
                    (i + 1) % all.len()
                } else {
                    (i + all.len() - 1) % all.len()
                };
                all[i]
            }
        };
        self.fields.priority = Some(next);
    }

    /// Steps the assignee through "unassigned" and every loaded user.
    pub fn cycle_assignee(&mut self, forward: bool) {
        let choices: Vec<&str> = std::iter::once("")
            .chain(self.users.iter().map(|u| u.id.as_str()))
            .collect();
        let current = choices
            .iter()
            .position(|c| *c == self.fields.assigned_to)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        self.fields.assigned_to = choices[next].to_string();
    }
}

//! Display-only queries over the canonical task list.

use chrono::NaiveDateTime;
use taskboard_proto::task::{Priority, Task};

/// Priority / due-date filter.
///
/// The two criteria are evaluated as separate cases rather than as a
/// generic conjunction: priority only, due date only, both, or neither
/// (which matches everything).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Keep tasks with this priority.
    pub priority: Option<Priority>,
    /// Keep tasks due exactly at this instant (wire precision, seconds).
    pub due_date: Option<NaiveDateTime>,
}

impl TaskFilter {
    /// Whether neither criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.priority.is_none() && self.due_date.is_none()
    }

    /// Whether `task` passes the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match (self.priority, self.due_date) {
            (Some(priority), None) => task.priority == priority.ordinal(),
            (None, Some(due)) => task.due_date == Some(due),
            (Some(priority), Some(due)) => {
                task.due_date == Some(due) && task.priority == priority.ordinal()
            }
            (None, None) => true,
        }
    }
}

/// The query currently applied to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    /// Every task.
    #[default]
    All,
    /// Tasks passing a [`TaskFilter`].
    Filtered(TaskFilter),
    /// Tasks whose message contains the text, ignoring case. Stored
    /// lowercased.
    Search(String),
}

impl View {
    /// Builds a search view for `text`.
    #[must_use]
    pub fn search(text: &str) -> Self {
        Self::Search(text.to_lowercase())
    }

    /// Whether `task` is visible under this view.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Filtered(filter) => filter.matches(task),
            Self::Search(needle) => task.message.to_lowercase().contains(needle.as_str()),
        }
    }
}

//! Priority buckets: the three column views derived from a task list.

use taskboard_proto::task::{Priority, Task};

/// Tasks partitioned by priority, in source order.
///
/// Only [`recompute_buckets`] builds one, so a `Buckets` value is always a
/// projection of some task sequence. Callers get read-only slices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    normal: Vec<Task>,
    medium: Vec<Task>,
    high: Vec<Task>,
}

impl Buckets {
    /// Tasks filed under `priority`.
    #[must_use]
    pub fn get(&self, priority: Priority) -> &[Task] {
        match priority {
            Priority::Normal => &self.normal,
            Priority::Medium => &self.medium,
            Priority::High => &self.high,
        }
    }

    /// Total number of bucketed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.normal.len() + self.medium.len() + self.high.len()
    }

    /// Whether every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets in column order (normal, medium, high).
    pub fn iter(&self) -> impl Iterator<Item = (Priority, &[Task])> {
        Priority::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    fn push(&mut self, priority: Priority, task: Task) {
        match priority {
            Priority::Normal => self.normal.push(task),
            Priority::Medium => self.medium.push(task),
            Priority::High => self.high.push(task),
        }
    }
}

/// Partitions `tasks` into priority buckets.
///
/// Each task lands in exactly one bucket chosen by its priority ordinal;
/// tasks whose ordinal is not 1, 2 or 3 are dropped. `assigned_name` is
/// cleared on every task without an assignee, whatever the input said.
pub fn recompute_buckets<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Buckets {
    let mut buckets = Buckets::default();
    for task in tasks {
        let Some(priority) = task.level() else {
            tracing::trace!(task_id = %task.id, priority = task.priority, "task outside buckets");
            continue;
        };
        let mut entry = task.clone();
        if !entry.is_assigned() {
            entry.assigned_name.clear();
        }
        buckets.push(priority, entry);
    }
    buckets
}

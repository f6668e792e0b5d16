//! The canonical task list and its priority buckets.
//!
//! `TaskListStore` owns the one authoritative `Vec<Task>`. The three
//! buckets the board renders are recomputed from it (through the active
//! [`View`]) after every mutation, before the mutating method returns, so
//! callers can never observe buckets that disagree with the list.
//!
//! Remote-backed operations come in two shapes: an async method that runs
//! the whole round trip against a [`TaskApi`], and a `finish_*` method that
//! applies a completion produced elsewhere (the UI loop hands the request
//! to the network worker and feeds the result back in later).

use chrono::NaiveDateTime;
use taskboard_proto::task::{Priority, Task, TaskId};

use super::StoreError;
use super::buckets::{Buckets, recompute_buckets};
use super::form::{FormAction, FormOutcome};
use super::notice::Notice;
use super::view::{TaskFilter, View};
use crate::api::{ApiError, TaskApi};

/// Canonical task list plus derived, read-only priority buckets.
#[derive(Debug, Default)]
pub struct TaskListStore {
    tasks: Vec<Task>,
    view: View,
    buckets: Buckets,
    loading: bool,
}

impl TaskListStore {
    /// Creates an empty, not-yet-loaded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `tasks`.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace_all(tasks);
        store
    }

    /// The canonical list, in order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All three buckets for the active view.
    #[must_use]
    pub const fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// One bucket for the active view.
    #[must_use]
    pub fn bucket(&self, priority: Priority) -> &[Task] {
        self.buckets.get(priority)
    }

    /// The active view query.
    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// Whether a list fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Looks up a task in the canonical list.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    fn recompute(&mut self) {
        let view = &self.view;
        self.buckets = recompute_buckets(self.tasks.iter().filter(|t| view.matches(t)));
    }

    // -- Canonical list mutations ------------------------------------------

    /// Replaces the whole list and shows it unfiltered.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.view = View::All;
        self.recompute();
    }

    /// Appends `task`. Adding the same task twice keeps both copies.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
        self.view = View::All;
        self.recompute();
    }

    /// Removes the first task whose id equals `id`.
    ///
    /// An unknown id leaves the list as it was.
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let removed = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .map(|index| self.tasks.remove(index));
        if removed.is_none() {
            tracing::debug!(task_id = %id, "remove: no such task");
        }
        self.view = View::All;
        self.recompute();
        removed
    }

    /// Replaces the task with `task.id` by removing it and appending `task`.
    ///
    /// The task therefore moves to the end of its bucket.
    pub fn update(&mut self, task: Task) {
        self.remove(&task.id);
        self.add(task);
    }

    // -- Display-only queries ----------------------------------------------

    /// Shows only tasks passing the priority / due-date filter. With both
    /// criteria unset the full list is shown. Clears any search.
    pub fn filter(&mut self, priority: Option<Priority>, due_date: Option<NaiveDateTime>) {
        let filter = TaskFilter { priority, due_date };
        self.view = if filter.is_empty() {
            View::All
        } else {
            View::Filtered(filter)
        };
        self.recompute();
    }

    /// Shows only tasks whose message contains `text`, ignoring case.
    /// Replaces any filter.
    pub fn search(&mut self, text: &str) {
        self.view = View::search(text);
        self.recompute();
    }

    /// Drops any filter or search.
    pub fn clear_view(&mut self) {
        self.view = View::All;
        self.recompute();
    }

    // -- Board ordering ----------------------------------------------------

    /// Canonical indices of the tasks shown in `bucket`, in bucket order.
    fn slots(&self, bucket: Priority) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.level() == Some(bucket) && self.view.matches(t))
            .map(|(i, _)| i)
            .collect()
    }

    /// Moves the card at `from` to position `to` inside one bucket.
    ///
    /// Purely local: no remote call, no priority change. `to` is clamped to
    /// the bucket. The new order is written back into the canonical list by
    /// permuting the bucket's tasks among the positions they already hold.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `from` is not a card in
    /// `bucket`.
    pub fn reorder_within_bucket(
        &mut self,
        bucket: Priority,
        from: usize,
        to: usize,
    ) -> Result<(), StoreError> {
        let slots = self.slots(bucket);
        if from >= slots.len() {
            return Err(StoreError::IndexOutOfRange {
                bucket,
                index: from,
                len: slots.len(),
            });
        }
        let to = to.min(slots.len() - 1);
        if from == to {
            return Ok(());
        }

        let mut order: Vec<Task> = slots.iter().map(|&i| self.tasks[i].clone()).collect();
        let moved = order.remove(from);
        order.insert(to, moved);
        for (&slot, task) in slots.iter().zip(order) {
            self.tasks[slot] = task;
        }
        self.recompute();
        Ok(())
    }

    /// Moves the card at `from` in `from_bucket` to position `to` in
    /// `to_bucket`, re-filing it under the destination priority.
    ///
    /// This is the local half of a drag between columns; it commits
    /// immediately and returns the moved task so the caller can send it to
    /// the service. `to` is clamped to the destination bucket.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SameBucket`] if the buckets are equal (use
    /// [`reorder_within_bucket`](Self::reorder_within_bucket)), or
    /// [`StoreError::IndexOutOfRange`] if `from` is not a card in
    /// `from_bucket`.
    pub fn transfer_between_buckets(
        &mut self,
        from_bucket: Priority,
        to_bucket: Priority,
        from: usize,
        to: usize,
    ) -> Result<Task, StoreError> {
        if from_bucket == to_bucket {
            return Err(StoreError::SameBucket(from_bucket));
        }
        let from_slots = self.slots(from_bucket);
        let Some(&source) = from_slots.get(from) else {
            return Err(StoreError::IndexOutOfRange {
                bucket: from_bucket,
                index: from,
                len: from_slots.len(),
            });
        };
        let to_slots = self.slots(to_bucket);
        let shift = |index: usize| if index > source { index - 1 } else { index };

        let mut task = self.tasks.remove(source);
        task.priority = to_bucket.ordinal();
        let insert_at = match (to_slots.get(to), to_slots.last()) {
            (Some(&target), _) => shift(target),
            (None, Some(&last)) => shift(last) + 1,
            (None, None) => self.tasks.len(),
        };
        self.tasks.insert(insert_at, task.clone());
        self.recompute();

        tracing::debug!(
            task_id = %task.id,
            from = %from_bucket,
            to = %to_bucket,
            "moved task between buckets"
        );
        Ok(task)
    }

    // -- Remote completions ------------------------------------------------

    /// Marks a list fetch as started.
    pub const fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Applies the result of a list fetch.
    ///
    /// On success the list is replaced wholesale. On failure the list is
    /// left exactly as it was and a failure notice is returned.
    pub fn finish_load(&mut self, result: Result<Vec<Task>, ApiError>) -> Option<Notice> {
        self.loading = false;
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "task list loaded");
                self.replace_all(tasks);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "task list load failed");
                Some(Notice::Failed)
            }
        }
    }

    /// Applies the result of a delete call: the task is removed only if the
    /// service confirmed.
    pub fn finish_delete(&mut self, id: &TaskId, result: Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => {
                self.remove(id);
                Notice::Deleted
            }
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "delete failed");
                Notice::Failed
            }
        }
    }

    /// Notice for the remote half of a drag between buckets.
    ///
    /// The local move has already been committed and is kept either way.
    #[must_use]
    pub fn finish_priority_change(task_id: &TaskId, result: &Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => Notice::PriorityUpdated,
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "priority change failed remotely");
                Notice::Failed
            }
        }
    }

    /// Merges a reconciled task from a completed form session.
    pub fn apply_form_outcome(&mut self, outcome: FormOutcome) -> Notice {
        match outcome.action {
            FormAction::Add => {
                self.add(outcome.task);
                Notice::Added
            }
            FormAction::Edit => {
                self.update(outcome.task);
                Notice::Edited
            }
        }
    }

    // -- Full round trips --------------------------------------------------

    /// Fetches the task list from `api` and applies it.
    pub async fn load<A: TaskApi>(&mut self, api: &A) -> Option<Notice> {
        self.begin_load();
        let result = api.list_tasks().await;
        self.finish_load(result)
    }

    /// Deletes `id` remotely, then locally if the service confirmed.
    pub async fn delete<A: TaskApi>(&mut self, api: &A, id: &TaskId) -> Notice {
        let result = api.delete_task(id).await;
        self.finish_delete(id, result)
    }

    /// Drag-and-drop between buckets.
    ///
    /// The local transfer is committed before the remote update is sent and
    /// is not rolled back if the service refuses it; the outcome only
    /// selects the notice.
    ///
    /// # Errors
    ///
    /// Same as [`transfer_between_buckets`](Self::transfer_between_buckets);
    /// no remote call is made in that case.
    pub async fn move_between_buckets<A: TaskApi>(
        &mut self,
        api: &A,
        from_bucket: Priority,
        to_bucket: Priority,
        from: usize,
        to: usize,
    ) -> Result<Notice, StoreError> {
        let moved = self.transfer_between_buckets(from_bucket, to_bucket, from, to)?;
        let result = api.update_task(&moved).await.map(|_| ());
        Ok(Self::finish_priority_change(&moved.id, &result))
    }
}

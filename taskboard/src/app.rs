//! Application state and event handling.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_proto::datetime::parse_input;
use taskboard_proto::task::{Priority, Task, TaskId};

use crate::net::{NetCommand, NetEvent};
use crate::tasks::{FormMode, Notice, TaskFormController, TaskListStore};

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The three priority columns (default).
    Board,
    /// The priority / due-date filter bar.
    Filter,
    /// The search box.
    Search,
    /// The add/edit form popup.
    Form,
}

/// Field being edited in the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Priority selector.
    Priority,
    /// Due-date text.
    DueDate,
}

/// Field being edited in the form popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Task description.
    Message,
    /// Due date text.
    DueDate,
    /// Priority selector.
    Priority,
    /// Assignee selector.
    Assignee,
}

impl FormField {
    const ORDER: [Self; 4] = [Self::Message, Self::DueDate, Self::Priority, Self::Assignee];

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { i + 1 } else { i + len - 1 };
        Self::ORDER[next % len]
    }
}

/// A card picked up for keyboard drag-and-drop.
///
/// The card is held by id: completions applied while it is held re-bucket
/// the board, so its position is looked up again when it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grab {
    /// Column the card was picked up from.
    pub origin: Priority,
    /// The held task.
    pub task_id: TaskId,
}

/// Cursor over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Selected column.
    pub column: Priority,
    /// Selected row in that column.
    pub row: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            column: Priority::Normal,
            row: 0,
        }
    }
}

/// Main application state.
pub struct App {
    /// Task list and buckets.
    pub store: TaskListStore,
    /// Open add/edit session, if any.
    pub form: Option<TaskFormController>,
    /// Field focused inside the form.
    pub form_field: FormField,
    /// Which part of the screen is focused.
    pub focus: Focus,
    /// Board selection.
    pub cursor: Cursor,
    /// Card being dragged, if any. While set, `cursor` is the drop target.
    pub grab: Option<Grab>,
    /// Priority chosen in the filter bar.
    pub filter_priority: Option<Priority>,
    /// Due date typed in the filter bar.
    pub filter_due: String,
    /// Field focused in the filter bar.
    pub filter_field: FilterField,
    /// Text typed in the search box.
    pub search_text: String,
    /// Notice on screen and when it expires.
    pub notice: Option<(Notice, Instant)>,
    /// How long notices stay visible.
    pub notice_timeout: Duration,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create an application with an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: TaskListStore::new(),
            form: None,
            form_field: FormField::Message,
            focus: Focus::Board,
            cursor: Cursor::default(),
            grab: None,
            filter_priority: None,
            filter_due: String::new(),
            filter_field: FilterField::Priority,
            search_text: String::new(),
            notice: None,
            notice_timeout: Duration::from_secs(3),
            should_quit: false,
        }
    }

    /// Sets how long notices stay on screen.
    #[must_use]
    pub const fn with_notice_timeout(mut self, timeout: Duration) -> Self {
        self.notice_timeout = timeout;
        self
    }

    /// Starts fetching the task list.
    pub fn request_load(&mut self) -> NetCommand {
        self.store.begin_load();
        NetCommand::LoadTasks
    }

    /// Shows `notice` until the timeout elapses.
    pub fn notify(&mut self, notice: Notice) {
        tracing::debug!(%notice, "notice");
        self.notice = Some((notice, Instant::now() + self.notice_timeout));
    }

    /// Expires the current notice once its time is up.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if self.notice.is_some_and(|(_, until)| now >= until) {
            self.notice = None;
        }
    }

    /// The card under the board cursor.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.bucket(self.cursor.column).get(self.cursor.row)
    }

    // -- Network completions -----------------------------------------------

    /// Applies one completion from the network worker.
    pub fn apply_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::TasksLoaded(result) => {
                if let Some(notice) = self.store.finish_load(result) {
                    self.notify(notice);
                }
            }
            NetEvent::UsersLoaded(result) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_users(result);
                }
            }
            NetEvent::Submitted { request, result } => {
                match TaskFormController::complete(request, result) {
                    Ok(outcome) => {
                        let notice = self.store.apply_form_outcome(outcome);
                        self.close_form();
                        self.notify(notice);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "form submission failed");
                        self.notify(e.notice());
                    }
                }
            }
            NetEvent::Deleted { id, result } => {
                let notice = self.store.finish_delete(&id, result);
                self.notify(notice);
            }
            NetEvent::PriorityChanged { task_id, result } => {
                let notice = TaskListStore::finish_priority_change(&task_id, &result);
                self.notify(notice);
            }
        }
        self.clamp_cursor();
    }

    // -- Keys --------------------------------------------------------------

    /// Handle a key event. Returns a command when the key needs the network.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<NetCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        let command = match self.focus {
            Focus::Board => self.handle_board_key(key),
            Focus::Filter => {
                self.handle_filter_key(key);
                None
            }
            Focus::Search => {
                self.handle_search_key(key);
                None
            }
            Focus::Form => self.handle_form_key(key),
        };
        self.clamp_cursor();
        command
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        if self.grab.is_some() {
            return self.handle_grab_key(key);
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.move_column(false),
            KeyCode::Right | KeyCode::Char('l') => self.move_column(true),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.row = self.cursor.row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.row += 1,
            KeyCode::Char('a') => return Some(self.open_form(None)),
            KeyCode::Char('e') | KeyCode::Enter => {
                let task = self.selected_task().cloned()?;
                return Some(self.open_form(Some(&task)));
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let task = self.selected_task()?;
                return Some(NetCommand::Delete(task.id.clone()));
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task() {
                    self.grab = Some(Grab {
                        origin: self.cursor.column,
                        task_id: task.id.clone(),
                    });
                }
            }
            KeyCode::Char('f') => self.focus = Focus::Filter,
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('c') => self.clear_view(),
            KeyCode::Char('r') => return Some(self.request_load()),
            _ => {}
        }
        None
    }

    /// Keys while a card is held. The cursor marks the drop position; it may
    /// sit one past the last card of a column.
    fn handle_grab_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        let grab = self.grab.clone()?;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_column(false),
            KeyCode::Right | KeyCode::Char('l') => self.move_column(true),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.row = self.cursor.row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.row += 1,
            KeyCode::Esc => {
                self.grab = None;
                self.cursor = Cursor {
                    column: grab.origin,
                    row: self.held_index(&grab).unwrap_or(0),
                };
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.grab = None;
                return self.drop_card(grab);
            }
            _ => {}
        }
        None
    }

    /// Current position of the held card in its origin column.
    fn held_index(&self, grab: &Grab) -> Option<usize> {
        self.store
            .bucket(grab.origin)
            .iter()
            .position(|t| t.id == grab.task_id)
    }

    fn drop_card(&mut self, grab: Grab) -> Option<NetCommand> {
        let Some(from) = self.held_index(&grab) else {
            tracing::warn!(task_id = %grab.task_id, "held card left its column, drop cancelled");
            self.notify(Notice::Failed);
            return None;
        };
        let target = self.cursor;
        let result = if target.column == grab.origin {
            self.store
                .reorder_within_bucket(grab.origin, from, target.row)
                .map(|()| None)
        } else {
            self.store
                .transfer_between_buckets(grab.origin, target.column, from, target.row)
                .map(|task| Some(NetCommand::ChangePriority(task)))
        };
        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "drop rejected");
            self.notify(Notice::Failed);
            None
        })
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match (key.code, self.filter_field) {
            (KeyCode::Esc, _) => self.focus = Focus::Board,
            (KeyCode::Tab | KeyCode::BackTab, FilterField::Priority) => {
                self.filter_field = FilterField::DueDate;
            }
            (KeyCode::Tab | KeyCode::BackTab, FilterField::DueDate) => {
                self.filter_field = FilterField::Priority;
            }
            (KeyCode::Enter, _) => self.apply_filter(),
            (KeyCode::Left, FilterField::Priority) => {
                self.filter_priority = cycle_optional(self.filter_priority, false);
            }
            (KeyCode::Right | KeyCode::Char(' '), FilterField::Priority) => {
                self.filter_priority = cycle_optional(self.filter_priority, true);
            }
            (KeyCode::Char(c), FilterField::DueDate) => self.filter_due.push(c),
            (KeyCode::Backspace, FilterField::DueDate) => {
                self.filter_due.pop();
            }
            _ => {}
        }
    }

    fn apply_filter(&mut self) {
        let due = match self.filter_due.trim() {
            "" => None,
            raw => match parse_input(raw) {
                Ok(due) => Some(due),
                Err(e) => {
                    tracing::debug!(error = %e, "filter date rejected");
                    self.notify(Notice::InvalidDate);
                    return;
                }
            },
        };
        self.search_text.clear();
        self.store.filter(self.filter_priority, due);
        self.focus = Focus::Board;
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Board;
                return;
            }
            KeyCode::Char(c) => self.search_text.push(c),
            KeyCode::Backspace => {
                self.search_text.pop();
            }
            _ => return,
        }
        if self.search_text.is_empty() {
            self.store.clear_view();
        } else {
            self.store.search(&self.search_text);
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        let field = self.form_field;
        let form = self.form.as_mut()?;
        match (key.code, field) {
            (KeyCode::Esc, _) => self.close_form(),
            (KeyCode::Tab, _) => self.form_field = field.step(true),
            (KeyCode::BackTab, _) => self.form_field = field.step(false),
            (KeyCode::Enter, _) => match form.prepare() {
                Ok(request) => return Some(NetCommand::Submit(request)),
                Err(e) => {
                    let notice = e.notice();
                    self.notify(notice);
                }
            },
            (KeyCode::Left, FormField::Priority) => form.cycle_priority(false),
            (KeyCode::Right | KeyCode::Char(' '), FormField::Priority) => {
                form.cycle_priority(true);
            }
            (KeyCode::Left, FormField::Assignee) => form.cycle_assignee(false),
            (KeyCode::Right | KeyCode::Char(' '), FormField::Assignee) => {
                form.cycle_assignee(true);
            }
            (KeyCode::Char(c), FormField::Message) => form.fields_mut().message.push(c),
            (KeyCode::Char(c), FormField::DueDate) => form.fields_mut().due_date.push(c),
            (KeyCode::Backspace, FormField::Message) => {
                form.fields_mut().message.pop();
            }
            (KeyCode::Backspace, FormField::DueDate) => {
                form.fields_mut().due_date.pop();
            }
            _ => {}
        }
        None
    }

    // -- Helpers -----------------------------------------------------------

    fn open_form(&mut self, existing: Option<&Task>) -> NetCommand {
        let form = TaskFormController::initialize(existing);
        tracing::debug!(edit = matches!(form.mode(), FormMode::Edit(_)), "form opened");
        self.form = Some(form);
        self.form_field = FormField::Message;
        self.focus = Focus::Form;
        NetCommand::LoadUsers
    }

    fn close_form(&mut self) {
        self.form = None;
        if self.focus == Focus::Form {
            self.focus = Focus::Board;
        }
    }

    fn clear_view(&mut self) {
        self.filter_priority = None;
        self.filter_due.clear();
        self.search_text.clear();
        self.store.clear_view();
    }

    fn move_column(&mut self, forward: bool) {
        let i = usize::from(self.cursor.column.ordinal() - 1);
        let next = if forward {
            (i + 1).min(Priority::ALL.len() - 1)
        } else {
            i.saturating_sub(1)
        };
        self.cursor.column = Priority::ALL[next];
    }

    /// Keeps the cursor on a card, or one past the end while dragging.
    fn clamp_cursor(&mut self) {
        let len = self.store.bucket(self.cursor.column).len();
        let dragging_elsewhere = self
            .grab
            .as_ref()
            .is_some_and(|g| g.origin != self.cursor.column);
        let max = if dragging_elsewhere {
            len
        } else {
            len.saturating_sub(1)
        };
        self.cursor.row = self.cursor.row.min(max);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Steps through "any", Normal, Medium, High.
fn cycle_optional(current: Option<Priority>, forward: bool) -> Option<Priority> {
    let choices = [
        None,
        Some(Priority::Normal),
        Some(Priority::Medium),
        Some(Priority::High),
    ];
    let i = choices.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward {
        i + 1
    } else {
        i + choices.len() - 1
    };
    choices[next % choices.len()]
}

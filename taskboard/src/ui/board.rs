//! The three priority columns.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use taskboard_proto::datetime::format_input;
use taskboard_proto::task::{Priority, Task};

use super::theme;
use crate::app::{App, Focus};

/// Render one column per priority.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (priority, column) in Priority::ALL.into_iter().zip(columns.iter()) {
        render_column(frame, *column, app, priority);
    }
}

fn render_column(frame: &mut Frame, area: Rect, app: &App, priority: Priority) {
    let board_focused = app.focus == Focus::Board;
    let is_current = board_focused && app.cursor.column == priority;
    let tasks = app.store.bucket(priority);

    let mut items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(row, task)| {
            let held = app
                .grab
                .as_ref()
                .is_some_and(|g| g.origin == priority && g.task_id == task.id);
            let style = if held {
                theme::grabbed()
            } else if is_current && app.cursor.row == row {
                theme::selected()
            } else {
                theme::normal()
            };
            card(task).style(style)
        })
        .collect();

    // Drop slot after the last card while dragging into another column.
    if is_current
        && app.grab.as_ref().is_some_and(|g| g.origin != priority)
        && app.cursor.row >= tasks.len()
    {
        items.push(ListItem::new(Line::from(Span::styled(
            "── drop here ──",
            theme::highlighted(),
        ))));
    }

    let title = Line::from(vec![
        Span::styled(
            priority.label(),
            theme::panel_title(theme::priority_color(priority)),
        ),
        Span::styled(format!(" ({})", tasks.len()), theme::dimmed()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::border(is_current));

    frame.render_widget(List::new(items).block(block), area);
}

fn card(task: &Task) -> ListItem<'_> {
    let mut lines = vec![Line::from(Span::raw(task.message.as_str()))];
    let mut meta = Vec::new();
    if let Some(due) = &task.due_date {
        meta.push(Span::styled(format!("due {}", format_input(due)), theme::dimmed()));
    }
    if !task.assigned_name.is_empty() {
        if !meta.is_empty() {
            meta.push(Span::raw("  "));
        }
        meta.push(Span::styled(format!("@{}", task.assigned_name), theme::dimmed()));
    }
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }
    ListItem::new(lines)
}

//! Add/edit form popup.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme;
use crate::app::FormField;
use crate::tasks::{FormMode, TaskFormController};

/// Render the form centered over `area`.
pub fn render(frame: &mut Frame, area: Rect, form: &TaskFormController, focused: FormField) {
    let popup = centered(area, 60, 10);
    frame.render_widget(Clear, popup);

    let fields = form.fields();
    let assignee = match form.assignee_name() {
        name if !name.is_empty() => name,
        _ if fields.assigned_to.is_empty() => "unassigned".to_string(),
        _ => fields.assigned_to.clone(),
    };
    let priority = fields.priority.map_or("choose", |p| p.label());

    let row = |label: &'static str, field: FormField, value: String, selector: bool| {
        let is_focused = field == focused;
        let mut value = if selector {
            format!("◂ {value} ▸")
        } else {
            value
        };
        if is_focused && !selector {
            value.push('█');
        }
        Line::from(vec![
            Span::styled(format!("{label:<10}"), theme::dimmed()),
            Span::styled(
                value,
                if is_focused {
                    theme::highlighted()
                } else {
                    theme::normal()
                },
            ),
        ])
    };

    let lines = vec![
        row("Message*", FormField::Message, fields.message.clone(), false),
        row("Due", FormField::DueDate, fields.due_date.clone(), false),
        row("Priority*", FormField::Priority, priority.to_string(), true),
        row("Assignee", FormField::Assignee, assignee, true),
        Line::raw(""),
        Line::from(Span::styled(
            "Tab: next field | ←→: choose | Enter: save | Esc: cancel",
            theme::dimmed(),
        )),
    ];

    let title = match form.mode() {
        FormMode::Add => "Add task".to_string(),
        FormMode::Edit(id) => format!("Edit task {id}"),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::bold()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

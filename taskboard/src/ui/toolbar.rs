//! Filter bar and search box.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, FilterField, Focus};

/// Render the filter bar (left) and the search box (right).
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_filter(frame, chunks[0], app);
    render_search(frame, chunks[1], app);
}

fn render_filter(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::Filter;
    let field_style = |field: FilterField| {
        if is_focused && app.filter_field == field {
            theme::highlighted()
        } else {
            theme::normal()
        }
    };

    let priority = app.filter_priority.map_or("any", |p| p.label());
    let mut due = app.filter_due.clone();
    if is_focused && app.filter_field == FilterField::DueDate {
        due.push('█');
    }

    let line = Line::from(vec![
        Span::styled("Priority: ", theme::dimmed()),
        Span::styled(format!("◂ {priority} ▸"), field_style(FilterField::Priority)),
        Span::raw("   "),
        Span::styled("Due: ", theme::dimmed()),
        Span::styled(
            if due.is_empty() { "YYYY-MM-DDTHH:MM".to_string() } else { due },
            field_style(FilterField::DueDate),
        ),
    ]);

    let block = Block::default()
        .title("Filter (f)")
        .borders(Borders::ALL)
        .border_style(theme::border(is_focused));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::Search;
    let mut text = app.search_text.clone();
    if is_focused {
        text.push('█');
    }
    let line = if text.is_empty() {
        Line::from(Span::styled("Search messages...", theme::dimmed()))
    } else {
        Line::from(Span::styled(text, theme::normal()))
    };

    let block = Block::default()
        .title("Search (/)")
        .borders(Borders::ALL)
        .border_style(theme::border(is_focused));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

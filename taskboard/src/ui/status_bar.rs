//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Focus};
use crate::tasks::View;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled("Taskboard", theme::bold()), Span::raw(" | ")];

    if app.store.is_loading() {
        spans.push(Span::styled("● loading", theme::normal().fg(theme::WARNING)));
        spans.push(Span::raw(" | "));
    }

    let view = match app.store.view() {
        View::All => None,
        View::Filtered(_) => Some("filtered".to_string()),
        View::Search(text) => Some(format!("search: {text}")),
    };
    if let Some(view) = view {
        spans.push(Span::styled(view, theme::highlighted()));
        spans.push(Span::raw(" | "));
    }

    if let Some((notice, _)) = app.notice {
        spans.push(Span::styled(
            format!("{}: ", notice.label()),
            theme::panel_title(theme::notice_color(notice.kind())),
        ));
        spans.push(Span::raw(notice.text()));
    } else {
        spans.push(Span::styled(help_text(app), theme::dimmed()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}

fn help_text(app: &App) -> &'static str {
    match app.focus {
        Focus::Board if app.grab.is_some() => "←→↑↓: move card | Space/Enter: drop | Esc: cancel",
        Focus::Board => {
            "a: add | e: edit | d: delete | Space: grab | f: filter | /: search | c: clear | r: reload | q: quit"
        }
        Focus::Filter => "Tab: field | ←→: priority | Enter: apply | Esc: back",
        Focus::Search => "type to search | Enter/Esc: back",
        Focus::Form => "Tab: next field | Enter: save | Esc: cancel",
    }
}

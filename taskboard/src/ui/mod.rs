//! Terminal UI rendering.

pub mod board;
pub mod form;
pub mod status_bar;
pub mod theme;
pub mod toolbar;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter + search
            Constraint::Min(5),    // Board
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    toolbar::render(frame, chunks[0], app);
    board::render(frame, chunks[1], app);
    status_bar::render(frame, chunks[2], app);

    if let Some(controller) = &app.form {
        form::render(frame, frame.area(), controller, app.form_field);
    }
}

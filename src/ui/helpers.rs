use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::{ActionError, ValidationError};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Title and body of the blocking dialog for a failed action. `verb` is the
/// gerund used in store failures, e.g. "adding".
pub(crate) fn failure_text(err: &ActionError, verb: &str) -> (&'static str, String) {
    match err {
        ActionError::Validation(ValidationError::MissingFields) => {
            ("Input Error", err.to_string())
        }
        ActionError::Validation(ValidationError::NoSelection(_)) => {
            ("Selection Error", err.to_string())
        }
        ActionError::Store(store_err) => {
            ("Database Error", format!("Error {verb} user: {store_err}"))
        }
        ActionError::Reload(store_err) => {
            ("Database Error", format!("Error loading users: {store_err}"))
        }
    }
}

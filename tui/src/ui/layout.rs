use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::{
    render_delete_confirmation, render_header, render_help_screen, render_note_detail, render_note_list,
    render_search_overlay, render_status_bar, render_toasts,
};

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.size();

    // Create main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Note list
            Constraint::Percentage(40), // Selected note
        ])
        .split(chunks[1]);
    render_note_list(frame, app, content[0]);
    render_note_detail(frame, app, content[1]);

    render_status_bar(frame, app, chunks[2]);

    // Overlays (drawn last)
    if app.search_open {
        render_search_overlay(frame, app, size);
    }
    if app.confirming_delete() {
        render_delete_confirmation(frame, app, size);
    }
    if app.help_open {
        render_help_screen(frame, app, size);
    }
    // Toasts sit on top of everything
    render_toasts(frame, app, size);
}

//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Search bar, favorites strip and status line
//! - `content`: Result list rendering
//! - `overlays`: Modal overlays (error alert, detail, help)

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::UiState;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState) {
        let favorites_height = if ui_state.favorites_visible { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                // Search bar + status
                Constraint::Length(favorites_height), // Favorites strip
                Constraint::Min(0),                   // Result list
                Constraint::Length(1),                // Status line
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state);

        if ui_state.favorites_visible {
            layout::render_favorites_strip(frame, chunks[1], ui_state);
        }

        content::render_main_content(frame, chunks[2], ui_state);
        layout::render_status_line(frame, chunks[3], ui_state);

        if ui_state.detail.is_some() {
            overlays::render_detail(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }

        // Error alert (drawn last, blocks everything else)
        if ui_state.error.is_some() {
            overlays::render_error_alert(frame, ui_state);
        }
    }
}

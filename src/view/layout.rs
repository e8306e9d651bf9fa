//! Layout rendering (search bar, favorites strip, status line)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, UiState};
use super::utils::truncate_string;

const FAVORITE_CELL_WIDTH: usize = 22;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(16), // Loading indicator
        ])
        .split(area);

    let focused = ui_state.active_section == ActiveSection::Search;
    let (search_text, search_style) = if ui_state.search_query.is_empty() {
        ("Search movies...", Style::default().fg(Color::DarkGray))
    } else if focused {
        (ui_state.search_query.as_str(), Style::default().fg(Color::Green))
    } else {
        (ui_state.search_query.as_str(), Style::default().fg(Color::White))
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(focused)),
    );
    frame.render_widget(search, chunks[0]);

    let (indicator, indicator_style) = if ui_state.is_loading {
        ("⟳ Loading", Style::default().fg(Color::Yellow))
    } else {
        ("✓ Ready", Style::default().fg(Color::Cyan))
    };
    let status = Paragraph::new(indicator)
        .style(indicator_style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);
}

/// Horizontal strip of favorite titles. Only drawn while favorites exist.
pub fn render_favorites_strip(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let focused = ui_state.active_section == ActiveSection::Favorites;
    let visible_cells = (area.width.saturating_sub(4) as usize / (FAVORITE_CELL_WIDTH + 1)).max(1);

    // Scroll so the selected cell stays on screen
    let first = ui_state
        .favorite_selected
        .saturating_sub(visible_cells.saturating_sub(1));

    let mut spans = Vec::new();
    for (i, record) in ui_state.favorites.iter().enumerate().skip(first).take(visible_cells) {
        let style = if i == ui_state.favorite_selected && focused {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else if i == ui_state.favorite_selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let label = format!("★ {}", record.track_name);
        spans.push(Span::styled(truncate_string(&label, FAVORITE_CELL_WIDTH), style));
        spans.push(Span::raw(" "));
    }

    let title = format!(" Favorites ({}) ", ui_state.favorites.len());
    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style(focused)),
    );
    frame.render_widget(strip, area);
}

pub fn render_status_line(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let mut spans = vec![Span::styled(
        format!(" {} results ", ui_state.results.len()),
        Style::default().fg(Color::White),
    )];

    if let Some(selected) = ui_state.selected_result() {
        spans.push(Span::styled(
            format!("│ {} ", truncate_string(&selected.track_name, 30).trim_end()),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(change) = ui_state.last_change {
        spans.push(Span::styled(
            format!("│ +{} -{} ↕{} ", change.inserted, change.removed, change.moved),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        "│ Tab: switch  Enter: open  f: favorite  h: help  q: quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

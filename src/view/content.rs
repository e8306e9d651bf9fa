//! Main content area rendering (result list)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, MediaRecord, UiState};
use super::utils::{calculate_media_column_widths, format_price, render_scrollable_list, truncate_string};

pub fn render_main_content(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::Results;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if ui_state.results.is_empty() {
        let text = if ui_state.is_loading {
            "Loading..."
        } else {
            "No results\n\nType at least four characters to search the catalog\nPress Esc in search to go back to saved media"
        };
        let content = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Results ")
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(content, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items = render_media_items(&ui_state.results, ui_state.results_selected, is_focused, content_width);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Results ({}) ", ui_state.results.len()))
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, area, items, ui_state.results_selected + 1, block); // +1 for header
}

fn render_media_items(
    records: &[MediaRecord],
    selected_index: usize,
    is_focused: bool,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let (num_width, title_width, artist_width, genre_width, price_width) =
        calculate_media_column_widths(content_width, records.len());

    let header = format!(
        " {:>num_width$} {:2} {}   {}   {}   {:>price_width$}",
        "#",
        "",
        truncate_string("Title", title_width),
        truncate_string("Artist", artist_width),
        truncate_string("Genre", genre_width),
        "Price",
    );
    let mut items = vec![ListItem::new(header).style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD))];

    items.extend(records.iter().enumerate().map(|(i, record)| {
        let favorite = if record.is_favorite { "★" } else { " " };
        let line = format!(
            " {:>num_width$} {:2} {}   {}   {}   {:>price_width$}",
            i + 1,
            favorite,
            truncate_string(&record.track_name, title_width),
            truncate_string(&record.artist_name, artist_width),
            truncate_string(record.genre(), genre_width),
            format_price(record.track_price),
        );

        let style = if i == selected_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if i == selected_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else if record.is_favorite {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        ListItem::new(line).style(style)
    }));

    items
}

//! Overlay rendering (error alert, media detail, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{MediaRecord, UiState};
use super::utils::{format_duration, format_price, format_timestamp};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_error_alert(frame: &mut Frame, ui_state: &UiState) {
    let Some(error) = &ui_state.error else {
        return;
    };
    let area = frame.area();

    // Fixed width popup (responsive to screen size)
    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize; // account for borders

    let message = error.message.as_deref().unwrap_or("Something went wrong.");
    let hint = if error.retry.is_some() {
        "Enter/R: retry   Esc: dismiss"
    } else {
        "Esc: dismiss"
    };

    // Wrapped message lines + blank + hint + borders
    let message_lines = (message.chars().count() as f32 / inner_width as f32).ceil() as u16;
    let popup_height = (message_lines.max(1) + 4).min(area.height.saturating_sub(4));
    let popup_area = centered(area, popup_width, popup_height);

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];

    let title = format!(" {} ", error.title.as_deref().unwrap_or("Error"));
    let alert = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(title)
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(alert, popup_area);
}

fn detail_field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:>12}  ", label),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn detail_lines(record: &MediaRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        detail_field("Artist", record.artist_name.clone()),
        detail_field("Genre", record.genre().to_string()),
        detail_field("Released", record.release_year().unwrap_or_else(|| "Unknown".to_string())),
        detail_field("Runtime", format_duration(record.track_time_millis)),
        detail_field("Price", format_price(record.track_price)),
    ];

    if record.track_rental_price > 0.0 {
        lines.push(detail_field("Rent", format_price(record.track_rental_price)));
    }
    if let Some(rating) = &record.content_advisory_rating {
        lines.push(detail_field("Rated", rating.clone()));
    }
    if let Some(visited) = &record.last_visit_at {
        lines.push(detail_field("Last visit", format_timestamp(visited)));
    }

    if let Some(description) = record.long_description.as_ref().or(record.short_description.as_ref()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

pub fn render_detail(frame: &mut Frame, ui_state: &UiState) {
    let Some(record) = &ui_state.detail else {
        return;
    };
    let area = frame.area();
    let popup_area = centered(area, 72, area.height.saturating_sub(4).min(24));

    frame.render_widget(Clear, popup_area);

    let star = if record.is_favorite { "★ " } else { "" };
    let title = format!(" {}{} ", star, record.track_name);
    let footer = Line::from(" F: toggle favorite   Esc: back ").right_aligned();

    let detail = Paragraph::new(detail_lines(record))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .title_bottom(footer)
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(detail, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = [
        ("", "── Search ──"),
        ("Type", "Search after a short pause"),
        ("Enter", "Search now"),
        ("Esc", "Clear and show saved media"),
        ("", ""),
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓ / ← / →", "Move selection"),
        ("Enter", "Open detail"),
        ("G or /", "Focus search"),
        ("", ""),
        ("", "── Actions ──"),
        ("F", "Favorite / Unfavorite"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q / Ctrl+Q", "Quit"),
    ];

    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_area = centered(area, 62, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;

    #[test]
    fn centered_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered(area, 60, 4);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.y, 3);
    }

    #[test]
    fn detail_shows_last_visit_only_once_visited() {
        let mut media = record(1, "Heat");
        let before = detail_lines(&media).len();
        media.last_visit_at = Some(chrono::Utc::now());
        assert_eq!(detail_lines(&media).len(), before + 1);
    }
}

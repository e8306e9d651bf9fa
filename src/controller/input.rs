//! Key event handling
//!
//! Keys only touch view state directly. Anything that needs the store or
//! the catalog comes back as a [`Command`] for the controller.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::events::Command;
use crate::model::{ActiveSection, UiState};

pub fn handle_key_event(key: KeyEvent, ui: &mut UiState) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if is_ctrl_quit(&key) {
        ui.should_quit = true;
        return None;
    }

    // Handle error alert first (blocks all other interactions)
    if let Some(error) = &ui.error {
        return match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
                let retry = error.retry.clone();
                ui.clear_error();
                retry.map(Command::Retry)
            }
            KeyCode::Esc => {
                ui.clear_error();
                None
            }
            _ => None,
        };
    }

    // Handle help popup
    if ui.show_help_popup {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
            ui.show_help_popup = false;
        }
        return None;
    }

    // Handle detail view
    if let Some(detail) = &ui.detail {
        return match key.code {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::ToggleFavoriteRecord(detail.track_id)),
            KeyCode::Esc | KeyCode::Backspace => {
                ui.detail = None;
                None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                ui.should_quit = true;
                None
            }
            _ => None,
        };
    }

    match ui.active_section {
        ActiveSection::Search => handle_search_key(key, ui),
        ActiveSection::Favorites => handle_favorites_key(key, ui),
        ActiveSection::Results => handle_results_key(key, ui),
    }
}

fn is_ctrl_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
}

fn handle_search_key(key: KeyEvent, ui: &mut UiState) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::SearchSubmitted(ui.search_query.clone())),
        KeyCode::Esc => {
            ui.search_query.clear();
            Some(Command::SearchCancelled)
        }
        KeyCode::Backspace => {
            ui.search_query.pop()?;
            Some(Command::QueryChanged(ui.search_query.clone()))
        }
        KeyCode::Char(c) => {
            ui.search_query.push(c);
            Some(Command::QueryChanged(ui.search_query.clone()))
        }
        KeyCode::Down => {
            ui.active_section = ActiveSection::Results;
            None
        }
        _ => handle_global_key(key, ui),
    }
}

fn handle_favorites_key(key: KeyEvent, ui: &mut UiState) -> Option<Command> {
    match key.code {
        KeyCode::Left | KeyCode::Up => {
            ui.move_selection_up();
            None
        }
        KeyCode::Right | KeyCode::Down => {
            ui.move_selection_down();
            None
        }
        KeyCode::Enter => Some(Command::SelectFavorite(ui.favorite_selected)),
        _ => handle_global_key(key, ui),
    }
}

fn handle_results_key(key: KeyEvent, ui: &mut UiState) -> Option<Command> {
    match key.code {
        KeyCode::Up => {
            ui.move_selection_up();
            None
        }
        KeyCode::Down => {
            ui.move_selection_down();
            None
        }
        KeyCode::Enter if !ui.results.is_empty() => Some(Command::Select(ui.results_selected)),
        KeyCode::Char('f') | KeyCode::Char('F') if !ui.results.is_empty() => {
            Some(Command::ToggleFavorite(ui.results_selected))
        }
        _ => handle_global_key(key, ui),
    }
}

fn handle_global_key(key: KeyEvent, ui: &mut UiState) -> Option<Command> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => ui.should_quit = true,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => ui.cycle_section_backward(),
        KeyCode::Tab => ui.cycle_section_forward(),
        KeyCode::BackTab => ui.cycle_section_backward(),
        KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') => {
            ui.active_section = ActiveSection::Search;
        }
        KeyCode::Char('h') | KeyCode::Char('H') => ui.show_help_popup = true,
        _ => {}
    }
    None
}

//! View-side state, rebuilt from presentation events

use crate::events::{ErrorState, LoadingState, PresentationEvent};

use super::items::{FavoriteDiff, FavoriteSnapshot, MainDiff, MainSnapshot};
use super::media::MediaRecord;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Favorites,
    Results,
}

impl ActiveSection {
    /// Next focusable section. The favorites strip is skipped while hidden.
    pub fn next(self, favorites_visible: bool) -> Self {
        match self {
            Self::Search if favorites_visible => Self::Favorites,
            Self::Search | Self::Favorites => Self::Results,
            Self::Results => Self::Search,
        }
    }

    pub fn prev(self, favorites_visible: bool) -> Self {
        match self {
            Self::Results if favorites_visible => Self::Favorites,
            Self::Results | Self::Favorites => Self::Search,
            Self::Search => Self::Results,
        }
    }
}

/// Counts of the last non-empty list change, shown in the status line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub inserted: usize,
    pub removed: usize,
    pub moved: usize,
}

impl ChangeSummary {
    fn of_main(diff: &MainDiff) -> Self {
        Self {
            inserted: diff.inserted.len(),
            removed: diff.removed.len(),
            moved: diff.moved.len(),
        }
    }

    fn of_favorites(diff: &FavoriteDiff) -> Self {
        Self {
            inserted: diff.inserted.len(),
            removed: diff.removed.len(),
            moved: diff.moved.len(),
        }
    }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub results: Vec<MediaRecord>,
    pub results_selected: usize,
    pub favorites: Vec<MediaRecord>,
    pub favorites_visible: bool,
    pub favorite_selected: usize,
    pub is_loading: bool,
    pub error: Option<ErrorState>,
    pub detail: Option<MediaRecord>,
    pub show_help_popup: bool,
    pub last_change: Option<ChangeSummary>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            results: vec![],
            results_selected: 0,
            favorites: vec![],
            favorites_visible: false,
            favorite_selected: 0,
            is_loading: false,
            error: None,
            detail: None,
            show_help_popup: false,
            last_change: None,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn apply(&mut self, event: PresentationEvent) {
        match event {
            PresentationEvent::Loading(state) => {
                self.is_loading = state == LoadingState::Started;
            }
            PresentationEvent::Error(error) => self.error = Some(error),
            PresentationEvent::MainList { snapshot, diff } => self.apply_main(&snapshot, &diff),
            PresentationEvent::Favorites {
                has_favorites,
                snapshot,
                diff,
            } => self.apply_favorites(has_favorites, &snapshot, &diff),
            PresentationEvent::Navigate(record) => {
                self.detail = Some(record);
            }
            PresentationEvent::RecordUpdated(record) => self.refresh_record(record),
        }
    }

    fn apply_main(&mut self, snapshot: &MainSnapshot, diff: &MainDiff) {
        // Keep the cursor on the same row when it survives the change
        let selected_id = snapshot_id_at(&self.results, self.results_selected);
        self.results = snapshot.all_items().map(|item| item.media.clone()).collect();
        self.results_selected = selected_id
            .and_then(|track_id| self.results.iter().position(|r| r.track_id == track_id))
            .unwrap_or(0);

        if !diff.is_empty() {
            self.last_change = Some(ChangeSummary::of_main(diff));
        }
    }

    fn apply_favorites(&mut self, has_favorites: bool, snapshot: &FavoriteSnapshot, diff: &FavoriteDiff) {
        self.favorites = snapshot.all_items().map(|item| item.media.clone()).collect();
        self.favorites_visible = has_favorites;
        self.favorite_selected = self.favorite_selected.min(self.favorites.len().saturating_sub(1));

        if !has_favorites && self.active_section == ActiveSection::Favorites {
            self.active_section = ActiveSection::Results;
        }
        if !diff.is_empty() {
            self.last_change = Some(ChangeSummary::of_favorites(diff));
        }
    }

    fn refresh_record(&mut self, record: MediaRecord) {
        for row in self.results.iter_mut().chain(self.favorites.iter_mut()) {
            if row.track_id == record.track_id {
                *row = record.clone();
            }
        }
        if let Some(detail) = self.detail.as_mut() {
            if detail.track_id == record.track_id {
                *detail = record;
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn selected_result(&self) -> Option<&MediaRecord> {
        self.results.get(self.results_selected)
    }

    pub fn move_selection_up(&mut self) {
        match self.active_section {
            ActiveSection::Results => self.results_selected = self.results_selected.saturating_sub(1),
            ActiveSection::Favorites => self.favorite_selected = self.favorite_selected.saturating_sub(1),
            ActiveSection::Search => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.active_section {
            ActiveSection::Results => {
                if self.results_selected + 1 < self.results.len() {
                    self.results_selected += 1;
                }
            }
            ActiveSection::Favorites => {
                if self.favorite_selected + 1 < self.favorites.len() {
                    self.favorite_selected += 1;
                }
            }
            ActiveSection::Search => {}
        }
    }

    pub fn cycle_section_forward(&mut self) {
        self.active_section = self.active_section.next(self.favorites_visible);
    }

    pub fn cycle_section_backward(&mut self) {
        self.active_section = self.active_section.prev(self.favorites_visible);
    }
}

fn snapshot_id_at(rows: &[MediaRecord], index: usize) -> Option<i64> {
    rows.get(index).map(|r| r.track_id)
}

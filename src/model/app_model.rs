//! Applied list state owned by the coordinator

use super::items::{FavoriteDiff, FavoriteSnapshot, ListItem, MainDiff, MainSnapshot};
use super::media::MediaRecord;
use super::snapshot::diff;

/// The snapshots most recently handed to the view.
///
/// Index lookups always go through these, so a stale index coming from the
/// view resolves against exactly what the view was showing or to nothing.
#[derive(Default)]
pub struct AppModel {
    main: MainSnapshot,
    favorites: FavoriteSnapshot,
    search_generation: u64,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Applying snapshots
    // ========================================================================

    /// Replace the main list and return what changed
    pub fn apply_main(&mut self, snapshot: MainSnapshot) -> MainDiff {
        let changes = diff(&self.main, &snapshot);
        tracing::debug!(
            changes = changes.change_count(),
            moved = changes.moved.len(),
            total = snapshot.len(),
            "Main list applied"
        );
        self.main = snapshot;
        changes
    }

    /// Replace the favorites strip and return what changed
    pub fn apply_favorites(&mut self, snapshot: FavoriteSnapshot) -> FavoriteDiff {
        let changes = diff(&self.favorites, &snapshot);
        tracing::debug!(changes = changes.change_count(), total = snapshot.len(), "Favorites applied");
        self.favorites = snapshot;
        changes
    }

    /// Copy fresh record content into every main-list row showing that track.
    /// Identities are untouched, so the list diff stays empty.
    pub fn refresh_record(&mut self, record: &MediaRecord) -> bool {
        let mut touched = false;
        self.main.update_items(|item| {
            if item.media.track_id == record.track_id {
                item.media = record.clone();
                touched = true;
            }
        });
        touched
    }

    pub fn main(&self) -> &MainSnapshot {
        &self.main
    }

    pub fn favorites(&self) -> &FavoriteSnapshot {
        &self.favorites
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn item_at(&self, index: usize) -> Option<MediaRecord> {
        self.main.item_at(index).map(|item| item.media.clone())
    }

    pub fn list_item_at(&self, index: usize) -> Option<ListItem> {
        self.main.item_at(index).cloned()
    }

    pub fn favorite_at(&self, index: usize) -> Option<MediaRecord> {
        self.favorites.item_at(index).map(|item| item.media.clone())
    }

    // ========================================================================
    // Search ordering
    // ========================================================================

    /// Start a new search and return its generation
    pub fn begin_search(&mut self) -> u64 {
        self.search_generation += 1;
        self.search_generation
    }

    /// Whether no newer search has started since `generation`
    pub fn is_latest_search(&self, generation: u64) -> bool {
        self.search_generation == generation
    }

    /// Invalidate any search still in flight
    pub fn cancel_searches(&mut self) {
        self.search_generation += 1;
    }
}

//! Favorites strip kept in sync with the record store
//!
//! The strip is never patched incrementally. Any favorite change reported by
//! a displayed item triggers a full recomputation from the store, which is
//! the only source of truth for the favorite flag.

use futures::stream::{self, SelectAll, StreamExt};
use futures::FutureExt;

use super::items::{build_favorite_snapshot, FavoriteSnapshot, IdentityStrategy, ItemAction, ItemNotifications};
use super::store::MediaStore;

/// Result of one recomputation
#[derive(Clone, Debug)]
pub struct FavoritesUpdate {
    pub has_favorites: bool,
    pub snapshot: FavoriteSnapshot,
}

#[derive(Clone)]
pub struct FavoritesSynchronizer {
    store: MediaStore,
    identity: IdentityStrategy,
}

impl FavoritesSynchronizer {
    pub fn new(store: MediaStore, identity: IdentityStrategy) -> Self {
        Self { store, identity }
    }

    /// Rebuild the strip from whatever the store currently marks as favorite
    pub async fn recompute(&self) -> FavoritesUpdate {
        let favorites = self.store.fetch_favorites().await;
        tracing::debug!(count = favorites.len(), "Favorites recomputed");
        FavoritesUpdate {
            has_favorites: !favorites.is_empty(),
            snapshot: build_favorite_snapshot(&favorites, self.identity),
        }
    }
}

/// Fan-in of every item's notification channel
pub struct MergedNotifications {
    inner: SelectAll<ItemNotifications>,
}

impl MergedNotifications {
    pub fn new(receivers: Vec<ItemNotifications>) -> Self {
        Self {
            inner: stream::select_all(receivers),
        }
    }

    /// Wait for the next burst of notifications.
    ///
    /// Everything already queued is drained along with the first action, so
    /// a burst yields one batch and therefore one recomputation. Returns
    /// `None` once every item has been dropped.
    pub async fn next_batch(&mut self) -> Option<Vec<ItemAction>> {
        let first = self.inner.next().await?;
        let mut batch = vec![first];
        while let Some(Some(action)) = self.inner.next().now_or_never() {
            batch.push(action);
        }
        Some(batch)
    }

    /// Swap in the receivers of a rebuilt list.
    ///
    /// Returns whatever the old receivers still had queued, so a change
    /// reported just before the rebuild is not lost.
    pub fn replace(&mut self, receivers: Vec<ItemNotifications>) -> Vec<ItemAction> {
        let mut pending = Vec::new();
        while let Some(Some(action)) = self.inner.next().now_or_never() {
            pending.push(action);
        }
        self.inner = stream::select_all(receivers);
        pending
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

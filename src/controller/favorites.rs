//! Favorite toggling and favorites strip synchronization

use crate::events::PresentationEvent;
use crate::model::{ItemAction, ItemNotifications, MainDiff, MediaRecord, MergedNotifications};

use tokio::sync::mpsc;

use super::{AppController, NotificationWatcher};

impl AppController {
    /// Recompute the favorites strip from the store and emit it
    pub async fn reload_favorites(&self) {
        // Held across the recompute so concurrent reloads apply in order
        let mut model = self.model.lock().await;
        let update = self.favorites.recompute().await;
        let diff = model.apply_favorites(update.snapshot.clone());
        self.emit(PresentationEvent::Favorites {
            has_favorites: update.has_favorites,
            snapshot: update.snapshot,
            diff,
        });
    }

    /// Flip the favorite flag of the main-list row at `index`
    pub async fn toggle_favorite(&self, index: usize) {
        let item = self.model.lock().await.list_item_at(index);
        let Some(item) = item else {
            tracing::debug!(index, "Favorite toggle out of range, ignoring");
            return;
        };
        self.toggle_favorite_record(item.media.track_id).await;
    }

    /// Flip the favorite flag of a record, wherever it is displayed
    pub async fn toggle_favorite_record(&self, track_id: i64) {
        let record = match self.store.toggle_favorite(track_id).await {
            Ok(record) => record,
            Err(e) => {
                self.report(e.into(), None);
                return;
            }
        };
        tracing::info!(track_id, is_favorite = record.is_favorite, "Favorite toggled");

        if let Err(e) = self.store.save().await {
            self.report(e.into(), None);
        }

        self.refresh_record(&record).await;
        self.announce_favorite(&record).await;
    }

    /// Push new record content into the main list without changing its layout
    async fn refresh_record(&self, record: &MediaRecord) {
        {
            let mut model = self.model.lock().await;
            if model.refresh_record(record) {
                self.emit(PresentationEvent::MainList {
                    snapshot: model.main().clone(),
                    diff: MainDiff::default(),
                });
            }
        }
        self.emit(PresentationEvent::RecordUpdated(record.clone()));
    }

    /// Report a favorite change through the displayed item, so the strip is
    /// recomputed by the notification watcher. Records with no live row
    /// recompute directly.
    async fn announce_favorite(&self, record: &MediaRecord) {
        let item = {
            let model = self.model.lock().await;
            model
                .main()
                .all_items()
                .find(|item| item.media.track_id == record.track_id)
                .cloned()
        };

        let action = ItemAction::FavoriteToggled {
            track_id: record.track_id,
            is_favorite: record.is_favorite,
        };
        let delivered = item.is_some_and(|item| item.notify(action));
        if !delivered {
            self.reload_favorites().await;
        }
    }

    /// Hand the receivers of a rebuilt main list to the notification watcher.
    ///
    /// Every burst of item notifications results in one favorites
    /// recomputation. The receivers of the previous list are dropped, but
    /// anything they still had queued triggers a reload first.
    pub(crate) fn watch_notifications(&self, notifications: Vec<ItemNotifications>) {
        let mut watcher = self
            .notification_watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        let notifications = match watcher.as_ref() {
            Some(running) => match running.subscriptions.send(notifications) {
                Ok(()) => return,
                Err(mpsc::error::SendError(notifications)) => notifications,
            },
            None => notifications,
        };

        let (subscriptions, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.clone().run_notification_watcher(notifications, receiver));
        if let Some(previous) = watcher.replace(NotificationWatcher { subscriptions, handle }) {
            previous.handle.abort();
        }
    }

    async fn run_notification_watcher(
        self,
        initial: Vec<ItemNotifications>,
        mut subscriptions: mpsc::UnboundedReceiver<Vec<ItemNotifications>>,
    ) {
        let mut merged = MergedNotifications::new(initial);
        loop {
            tokio::select! {
                subscription = subscriptions.recv() => {
                    let Some(receivers) = subscription else { break };
                    let pending = merged.replace(receivers);
                    if !pending.is_empty() {
                        tracing::debug!(count = pending.len(), "Favorite changes queued across a rebuild");
                        self.reload_favorites().await;
                    }
                }
                Some(batch) = merged.next_batch(), if !merged.is_empty() => {
                    for ItemAction::FavoriteToggled { track_id, is_favorite } in &batch {
                        tracing::debug!(track_id, is_favorite, "Item reported favorite change");
                    }
                    self.reload_favorites().await;
                }
            }
        }
        tracing::debug!("Notification watcher stopped");
    }
}

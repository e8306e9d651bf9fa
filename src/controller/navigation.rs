//! Selection and the detail view

use chrono::Utc;

use crate::events::PresentationEvent;
use crate::model::MediaRecord;

use super::AppController;

impl AppController {
    /// Open the detail view for the main-list row at `index`
    pub async fn select(&self, index: usize) {
        let record = self.model.lock().await.item_at(index);
        match record {
            Some(record) => self.open_detail(record).await,
            None => tracing::debug!(index, "Selection out of range, ignoring"),
        }
    }

    /// Open the detail view for the favorites strip cell at `index`
    pub async fn select_favorite(&self, index: usize) {
        let record = self.model.lock().await.favorite_at(index);
        match record {
            Some(record) => self.open_detail(record).await,
            None => tracing::debug!(index, "Favorite selection out of range, ignoring"),
        }
    }

    async fn open_detail(&self, record: MediaRecord) {
        tracing::info!(track_id = record.track_id, name = %record.track_name, "Opening detail");

        let record = match self.store.set_last_visit(record.track_id, Utc::now()).await {
            Ok(visited) => {
                if let Err(e) = self.store.save().await {
                    self.report(e.into(), None);
                }
                visited
            }
            Err(e) => {
                self.report(e.into(), None);
                record
            }
        };

        self.emit(PresentationEvent::Navigate(record));
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::events::PresentationEvent;
    use crate::model::fixtures::{raw, response};
    use crate::model::MediaStore;

    async fn preloaded(store: &MediaStore) -> (super::AppController, crate::events::EventReceiver) {
        let (catalog, _calls) = counting_catalog(|_| Ok(response(vec![])));
        let (controller, mut rx) = controller(store.clone(), catalog);
        controller.preload().await;
        drain(&mut rx);
        (controller, rx)
    }

    #[tokio::test]
    async fn select_navigates_and_stamps_visit() {
        let store = MediaStore::in_memory();
        store.upsert(&raw(1, "Heat")).await;
        store.upsert(&raw(2, "Ronin")).await;
        let (controller, mut rx) = preloaded(&store).await;

        controller.select(1).await;

        let events = drain(&mut rx);
        match events.as_slice() {
            [PresentationEvent::Navigate(record)] => {
                assert_eq!(record.track_id, 2);
                assert!(record.last_visit_at.is_some());
            }
            other => panic!("unexpected events: {other:?}"),
        }
        assert!(store.fetch_by_track_id(2).await.unwrap().last_visit_at.is_some());
        assert!(store.fetch_by_track_id(1).await.unwrap().last_visit_at.is_none());
    }

    #[tokio::test]
    async fn select_favorite_resolves_against_strip() {
        let store = MediaStore::in_memory();
        for id in 1..=3 {
            store.upsert(&raw(id, "m")).await;
        }
        store.set_favorite(3, true).await.unwrap();
        let (controller, mut rx) = preloaded(&store).await;

        controller.select_favorite(0).await;

        let navigated = drain(&mut rx).into_iter().find_map(|e| match e {
            PresentationEvent::Navigate(record) => Some(record.track_id),
            _ => None,
        });
        assert_eq!(navigated, Some(3));
    }

    #[tokio::test]
    async fn out_of_range_selection_is_ignored() {
        let store = MediaStore::in_memory();
        store.upsert(&raw(1, "Only")).await;
        let (controller, mut rx) = preloaded(&store).await;

        controller.select(5).await;
        controller.select_favorite(0).await;

        assert!(drain(&mut rx).is_empty());
    }
}

//! Preload, debounced search and result processing

use crate::error::AppError;
use crate::events::{LoadingState, PresentationEvent, RetryAction};
use crate::model::{build_main_snapshot, AppModel, MainBuild, MediaRecord, SearchRequest, SearchResponse};

use super::AppController;

impl AppController {
    /// Show what the store already has, or fetch the default term when it is empty
    pub async fn preload(&self) {
        self.emit(PresentationEvent::Loading(LoadingState::Started));

        let media = self.store.fetch_all().await;
        tracing::info!(count = media.len(), "Preloading persisted media");
        self.reload_favorites().await;

        if media.is_empty() {
            let term = self.config.default_term.clone();
            self.load_search(&term).await;
            return;
        }

        {
            let mut model = self.model.lock().await;
            // Persisted state wins over any search still in flight
            model.cancel_searches();
            self.apply_main(&mut model, &media);
        }
        self.emit(PresentationEvent::Loading(LoadingState::Stopped));
    }

    /// React to the search text changing.
    ///
    /// Clearing the text returns to the persisted list immediately. Anything
    /// else (re)arms the debounce timer; the query is only checked once the
    /// timer fires.
    pub async fn query_changed(&self, query: String) {
        self.debouncer.cancel();

        if query.is_empty() {
            self.preload().await;
            return;
        }

        let controller = self.clone();
        self.debouncer.schedule(async move {
            match controller.validate_query(&query) {
                Ok(term) => controller.load_search(&term).await,
                Err(e) => controller.report(e, None),
            }
        });
    }

    /// Explicit submit: bypass the debounce timer
    pub fn submit_search(&self, query: String) {
        self.debouncer.cancel();
        match self.validate_query(&query) {
            Ok(term) => self.spawn_search(term),
            Err(e) => self.report(e, None),
        }
    }

    /// Drop the pending trigger and go back to the persisted list
    pub async fn cancel_search(&self) {
        self.debouncer.cancel();
        self.preload().await;
    }

    pub(crate) fn spawn_search(&self, term: String) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.load_search(&term).await;
        });
    }

    fn validate_query(&self, query: &str) -> Result<String, AppError> {
        let min_len = self.config.min_query_len;
        if query.chars().count() > min_len {
            Ok(query.to_string())
        } else {
            Err(AppError::InvalidQuery {
                query: query.to_string(),
                min_len,
            })
        }
    }

    /// Query the catalog and show the results.
    ///
    /// A search overtaken by a newer one (or by a preload) is dropped when
    /// it completes, whether it succeeded or not.
    pub async fn load_search(&self, term: &str) {
        let generation = self.model.lock().await.begin_search();
        self.emit(PresentationEvent::Loading(LoadingState::Started));

        let request = SearchRequest::new(term, &self.config.country, &self.config.media);
        tracing::debug!(term, generation, "Search started");

        match self.catalog.search(request).await {
            Ok(response) => self.process_result(generation, response).await,
            Err(e) => {
                if !self.model.lock().await.is_latest_search(generation) {
                    tracing::debug!(generation, "Dropping failure of superseded search");
                    return;
                }
                self.report(e.into(), Some(RetryAction::Search(term.to_string())));
            }
        }
    }

    async fn process_result(&self, generation: u64, response: SearchResponse) {
        let mut records = Vec::with_capacity(response.results.len());
        for raw in &response.results {
            records.push(self.store.upsert(raw).await);
        }

        {
            let mut model = self.model.lock().await;
            if !model.is_latest_search(generation) {
                tracing::debug!(generation, "Dropping results of superseded search");
                return;
            }
            self.apply_main(&mut model, &records);
        }

        if let Err(e) = self.store.save().await {
            self.report(e.into(), None);
        }
        self.emit(PresentationEvent::Loading(LoadingState::Stopped));
    }

    /// Apply `records` as the new main list, emit it and start watching the
    /// new items. Called with the model locked so applies and their events
    /// stay in the same order.
    pub(crate) fn apply_main(&self, model: &mut AppModel, records: &[MediaRecord]) {
        let MainBuild { snapshot, notifications } = build_main_snapshot(records, self.config.identity);
        let diff = model.apply_main(snapshot.clone());
        self.emit(PresentationEvent::MainList { snapshot, diff });
        self.watch_notifications(notifications);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::super::testing::*;
    use crate::error::NetworkError;
    use crate::events::{LoadingState, PresentationEvent, RetryAction};
    use crate::model::fixtures::{raw, response};
    use crate::model::MediaStore;

    fn is_main(event: &PresentationEvent) -> bool {
        matches!(event, PresentationEvent::MainList { .. })
    }

    #[tokio::test]
    async fn first_launch_searches_default_term() {
        let (catalog, calls) = counting_catalog(|term| {
            assert_eq!(term, "star");
            Ok(response(vec![raw(1, "Star Wars"), raw(2, "Star Trek")]))
        });
        let store = MediaStore::in_memory();
        let (controller, mut rx) = controller(store.clone(), catalog);

        controller.preload().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.count().await, 2);

        let events = drain(&mut rx);
        assert!(matches!(events.first(), Some(PresentationEvent::Loading(LoadingState::Started))));
        let main = events.iter().find_map(main_track_ids).unwrap();
        assert_eq!(main, vec![1, 2]);
        assert!(matches!(events.last(), Some(PresentationEvent::Loading(LoadingState::Stopped))));

        let favorites_hidden = events.iter().any(|e| {
            matches!(e, PresentationEvent::Favorites { has_favorites: false, .. })
        });
        assert!(favorites_hidden);
    }

    #[tokio::test]
    async fn persisted_media_skips_network() {
        let store = MediaStore::in_memory();
        for id in 1..=5 {
            store.upsert(&raw(id, "m")).await;
        }
        store.set_favorite(2, true).await.unwrap();
        store.set_favorite(4, true).await.unwrap();

        let (catalog, calls) = counting_catalog(|_| Ok(response(vec![])));
        let (controller, mut rx) = controller(store, catalog);
        controller.preload().await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let events = drain(&mut rx);

        let favorites = events.iter().find_map(|e| match e {
            PresentationEvent::Favorites { has_favorites, snapshot, .. } => Some((
                *has_favorites,
                snapshot.all_items().map(|i| i.media.track_id).collect::<Vec<_>>(),
            )),
            _ => None,
        });
        assert_eq!(favorites, Some((true, vec![2, 4])));
        assert_eq!(events.iter().find_map(main_track_ids), Some(vec![1, 2, 3, 4, 5]));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_debounces_into_one_search() {
        let store = MediaStore::in_memory();
        store.upsert(&raw(1, "Old")).await;
        let (catalog, calls) = counting_catalog(|term| {
            assert_eq!(term, "alien");
            Ok(response(vec![raw(10, "Alien"), raw(11, "Aliens")]))
        });
        let (controller, mut rx) = controller(store, catalog);

        for prefix in ["a", "al", "ali", "alie", "alien"] {
            controller.query_changed(prefix.to_string()).await;
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let event = wait_for(&mut rx, is_main).await;
        assert_eq!(main_track_ids(&event), Some(vec![10, 11]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_never_searches() {
        let (catalog, calls) = counting_catalog(|_| Ok(response(vec![])));
        let (controller, _rx) = controller(MediaStore::in_memory(), catalog);

        controller.query_changed("ab".to_string()).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        tokio::task::yield_now().await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_search_and_preloads() {
        let store = MediaStore::in_memory();
        store.upsert(&raw(1, "Kept")).await;
        let (catalog, calls) = counting_catalog(|_| Ok(response(vec![raw(9, "Never")])));
        let (controller, mut rx) = controller(store, catalog);

        controller.query_changed("matrix".to_string()).await;
        controller.cancel_search().await;
        tokio::time::sleep(Duration::from_millis(2000)).await;
        tokio::task::yield_now().await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let main = drain(&mut rx).iter().filter_map(main_track_ids).last();
        assert_eq!(main, Some(vec![1]));
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_query_preloads_immediately() {
        let store = MediaStore::in_memory();
        store.upsert(&raw(3, "Stored")).await;
        let (catalog, calls) = counting_catalog(|_| Ok(response(vec![])));
        let (controller, mut rx) = controller(store, catalog);

        controller.query_changed("termi".to_string()).await;
        controller.query_changed(String::new()).await;

        assert_eq!(drain(&mut rx).iter().find_map(main_track_ids), Some(vec![3]));
        tokio::time::sleep(Duration::from_millis(2000)).await;
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_failure_raises_alert_with_retry() {
        let (catalog, _calls) = counting_catalog(|_| {
            Err(NetworkError::RetriesExhausted {
                attempts: 3,
                last: Box::new(NetworkError::Timeout),
            })
        });
        let (controller, mut rx) = controller(MediaStore::in_memory(), catalog);

        controller.load_search("heat").await;

        let events = drain(&mut rx);
        let stopped = events
            .iter()
            .position(|e| matches!(e, PresentationEvent::Loading(LoadingState::Stopped)))
            .unwrap();
        let error = events
            .iter()
            .position(|e| matches!(e, PresentationEvent::Error(_)))
            .unwrap();
        assert!(stopped < error);

        match &events[error] {
            PresentationEvent::Error(state) => {
                assert_eq!(state.title.as_deref(), Some("Error Alert"));
                assert!(state.message.is_some());
                assert_eq!(state.retry, Some(RetryAction::Search("heat".to_string())));
            }
            _ => unreachable!(),
        }
        assert!(!events.iter().any(|e| matches!(e, PresentationEvent::MainList { .. })));
    }

    #[tokio::test]
    async fn superseded_search_is_dropped() {
        let (catalog, _calls) = counting_catalog(|term| match term {
            "first" => Ok(response(vec![raw(1, "First")])),
            _ => Ok(response(vec![raw(2, "Second")])),
        });
        let (controller, mut rx) = controller(MediaStore::in_memory(), catalog);

        // Start a search, then let a newer one take its generation before it lands
        let stale = controller.model.lock().await.begin_search();
        controller.load_search("second").await;
        controller
            .process_result(stale, response(vec![raw(1, "First")]))
            .await;

        let mains: Vec<_> = drain(&mut rx).iter().filter_map(main_track_ids).collect();
        assert_eq!(mains, vec![vec![2]]);
    }

    #[tokio::test]
    async fn repeated_results_keep_existing_records() {
        let store = MediaStore::in_memory();
        let (catalog, _calls) = counting_catalog(|_| Ok(response(vec![raw(1, "Dune"), raw(2, "Dune II")])));
        let (controller, _rx) = controller(store.clone(), catalog);

        controller.load_search("dune").await;
        store.set_favorite(1, true).await.unwrap();
        controller.load_search("dune").await;

        assert_eq!(store.count().await, 2);
        assert!(store.fetch_by_track_id(1).await.unwrap().is_favorite);
    }

    #[tokio::test]
    async fn submit_ignores_short_queries() {
        let (catalog, calls) = counting_catalog(|_| Ok(response(vec![])));
        let (controller, _rx) = controller(MediaStore::in_memory(), catalog);

        controller.submit_search("abc".to_string());
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

//! Controller module - coordination between the view, the store and the catalog
//!
//! The controller receives [`Command`]s from the view, drives the record store
//! and the catalog client, applies list snapshots to the model and answers
//! with [`PresentationEvent`]s. It is organized into submodules by
//! responsibility:
//!
//! - `input`: Key event handling
//! - `search`: Preload, debounced search and result processing
//! - `favorites`: Favorite toggling and favorites strip synchronization
//! - `navigation`: Selection and the detail view
//! - `debounce`: Trailing-edge debounce timer

mod debounce;
mod favorites;
mod input;
mod navigation;
mod search;

use debounce::Debouncer;
pub use input::handle_key_event;

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::error::{AppError, NetworkError};
use crate::events::{
    Command, CommandReceiver, ErrorState, EventSender, LoadingState, PresentationEvent, RetryAction,
};
use crate::model::{AppModel, CatalogClient, FavoritesSynchronizer, ItemNotifications, MediaStore};

const ERROR_TITLE: &str = "Error Alert";

/// The long-lived task turning item notifications into favorites reloads,
/// fed with the receivers of every rebuilt main list
struct NotificationWatcher {
    subscriptions: mpsc::UnboundedSender<Vec<ItemNotifications>>,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    store: MediaStore,
    catalog: Arc<dyn CatalogClient>,
    favorites: FavoritesSynchronizer,
    events: EventSender,
    config: Arc<AppConfig>,
    debouncer: Debouncer,
    notification_watcher: Arc<std::sync::Mutex<Option<NotificationWatcher>>>,
}

impl AppController {
    pub fn new(
        config: AppConfig,
        store: MediaStore,
        catalog: Arc<dyn CatalogClient>,
        events: EventSender,
    ) -> Self {
        Self {
            model: Arc::new(Mutex::new(AppModel::new())),
            favorites: FavoritesSynchronizer::new(store.clone(), config.identity),
            debouncer: Debouncer::trailing(config.search_debounce),
            store,
            catalog,
            events,
            config: Arc::new(config),
            notification_watcher: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Process commands one at a time until the view hangs up
    pub async fn run(self, mut commands: CommandReceiver) {
        while let Some(command) = commands.recv().await {
            self.dispatch(command).await;
        }
        tracing::debug!("Command channel closed, controller stopping");
        self.shutdown();
    }

    pub async fn dispatch(&self, command: Command) {
        tracing::debug!(?command, "Dispatching command");
        match command {
            Command::Preload => self.preload().await,
            Command::QueryChanged(query) => self.query_changed(query).await,
            Command::SearchSubmitted(query) => self.submit_search(query),
            Command::SearchCancelled => self.cancel_search().await,
            Command::Select(index) => self.select(index).await,
            Command::SelectFavorite(index) => self.select_favorite(index).await,
            Command::ToggleFavorite(index) => self.toggle_favorite(index).await,
            Command::ToggleFavoriteRecord(track_id) => self.toggle_favorite_record(track_id).await,
            Command::Retry(RetryAction::Search(query)) => self.spawn_search(query),
        }
    }

    /// Stop background work: the pending debounce trigger and the
    /// notification watcher
    pub fn shutdown(&self) {
        self.debouncer.cancel();
        let mut watcher = self
            .notification_watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(watcher) = watcher.take() {
            watcher.handle.abort();
        }
    }

    pub(crate) fn emit(&self, event: PresentationEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Presentation channel closed, dropping event");
        }
    }

    /// Catalog failures stop loading and raise an alert. Store failures and
    /// short queries are only logged.
    pub(crate) fn report(&self, error: AppError, retry: Option<RetryAction>) {
        match error {
            AppError::Network(e) => {
                tracing::error!(error = %e, "Catalog request failed");
                self.emit(PresentationEvent::Loading(LoadingState::Stopped));
                self.emit(PresentationEvent::Error(ErrorState {
                    title: Some(ERROR_TITLE.to_string()),
                    message: Some(Self::format_error(&e)),
                    retry,
                }));
            }
            AppError::Store(e) => tracing::error!(error = %e, "Store operation failed"),
            AppError::InvalidQuery { query, min_len } => {
                tracing::debug!(query = %query, min_len, "Query too short, ignoring");
            }
        }
    }

    pub(crate) fn format_error(error: &NetworkError) -> String {
        match error {
            NetworkError::RetriesExhausted { last, .. } => Self::format_error(last),
            NetworkError::Timeout => {
                "The catalog took too long to respond. Check your connection and try again.".to_string()
            }
            NetworkError::Transport(_) => "Could not reach the catalog. Check your connection.".to_string(),
            NetworkError::Status { status: 429 } => "Rate limited. Please wait a moment.".to_string(),
            NetworkError::Status { status } if *status >= 500 => {
                format!("The catalog is unavailable right now (HTTP {}).", status)
            }
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::AppController;
    use crate::config::AppConfig;
    use crate::error::NetworkError;
    use crate::events::{self, EventReceiver, PresentationEvent};
    use crate::model::{IdentityStrategy, MediaStore, MockCatalogClient, SearchResponse};

    pub fn config() -> AppConfig {
        AppConfig {
            search_debounce: Duration::from_millis(1000),
            identity: IdentityStrategy::Stable,
            ..AppConfig::default()
        }
    }

    /// A catalog mock that answers every search with `respond` and counts calls
    pub fn counting_catalog<F>(respond: F) -> (MockCatalogClient, Arc<AtomicUsize>)
    where
        F: Fn(&str) -> Result<SearchResponse, NetworkError> + Send + 'static,
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut catalog = MockCatalogClient::new();
        catalog.expect_search().returning(move |request| {
            counter.fetch_add(1, Ordering::SeqCst);
            respond(&request.term)
        });
        (catalog, calls)
    }

    pub fn controller(store: MediaStore, catalog: MockCatalogClient) -> (AppController, EventReceiver) {
        let (tx, rx) = events::channel();
        (AppController::new(config(), store, Arc::new(catalog), tx), rx)
    }

    pub fn drain(rx: &mut EventReceiver) -> Vec<PresentationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the first event matching `matches`, skipping the others
    pub async fn wait_for<F>(rx: &mut EventReceiver, matches: F) -> PresentationEvent
    where
        F: Fn(&PresentationEvent) -> bool,
    {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out waiting for event")
                .expect("event channel closed");
            if matches(&event) {
                return event;
            }
        }
    }

    pub fn main_track_ids(event: &PresentationEvent) -> Option<Vec<i64>> {
        match event {
            PresentationEvent::MainList { snapshot, .. } => {
                Some(snapshot.all_items().map(|item| item.media.track_id).collect())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_unwraps_exhausted_retries() {
        let error = NetworkError::RetriesExhausted {
            attempts: 3,
            last: Box::new(NetworkError::Timeout),
        };
        assert!(AppController::format_error(&error).contains("too long"));
    }

    #[test]
    fn format_error_falls_back_to_display() {
        let error = NetworkError::Status { status: 404 };
        assert_eq!(AppController::format_error(&error), "Error: Catalog returned HTTP 404");
        assert!(AppController::format_error(&NetworkError::Status { status: 429 }).contains("Rate limited"));
    }
}

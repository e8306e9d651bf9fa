//! Model module - records, list snapshots and applied state
//!
//! - `media`: Media records and the catalog wire format
//! - `store`: JSON-backed record store
//! - `catalog_client`: iTunes search client
//! - `snapshot`: Generic sectioned snapshots and the diff between them
//! - `items`: List/favorite items and snapshot builders
//! - `favorites`: Favorites strip recomputation and notification fan-in
//! - `app_model`: Snapshots last applied to the view
//! - `types`: View-side UI state

mod media;
mod store;
mod catalog_client;
mod snapshot;
mod items;
mod favorites;
mod app_model;
mod types;

pub use media::{MediaRecord, SearchResponse};

pub use store::MediaStore;

pub use catalog_client::{CatalogClient, ItunesClient, SearchRequest};

#[cfg(test)]
pub use catalog_client::MockCatalogClient;

pub use items::{
    build_main_snapshot, FavoriteDiff, FavoriteSnapshot, IdentityStrategy, ItemAction, ItemNotifications,
    MainBuild, MainDiff, MainSnapshot,
};

pub use favorites::{FavoritesSynchronizer, MergedNotifications};

pub use app_model::AppModel;

pub use types::{ActiveSection, UiState};

#[cfg(test)]
pub(crate) use media::fixtures;

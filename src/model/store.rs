//! Local record store for media, persisted as a JSON file
//!
//! `MediaStore` is a cheap handle: clones share the same underlying records,
//! so a single store built in `main` can be handed to every component.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::media::{MediaRecord, RawMedia};
use crate::error::{StoreError, StoreResult};

#[derive(Default)]
struct StoreState {
    // Insertion order is fetch order
    records: Vec<MediaRecord>,
    dirty: bool,
}

impl StoreState {
    fn position(&self, track_id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.track_id == track_id)
    }

    fn get_mut(&mut self, track_id: i64) -> StoreResult<&mut MediaRecord> {
        self.records
            .iter_mut()
            .find(|r| r.track_id == track_id)
            .ok_or(StoreError::NotFound { track_id })
    }
}

#[derive(Clone)]
pub struct MediaStore {
    state: Arc<RwLock<StoreState>>,
    path: Option<PathBuf>,
}

impl MediaStore {
    /// A store that never touches the disk
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            path: None,
        }
    }

    /// Open the store at `path`, loading existing records if the file exists
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            path: Some(path),
        };
        store.load_from_disk().await?;
        Ok(store)
    }

    async fn load_from_disk(&self) -> StoreResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No media store on disk yet");
            return Ok(());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let records: Vec<MediaRecord> = serde_json::from_str(&content)?;
        tracing::info!(count = records.len(), path = %path.display(), "Media store loaded");

        let mut state = self.state.write().await;
        state.records = records;
        state.dirty = false;
        Ok(())
    }

    pub async fn fetch_all(&self) -> Vec<MediaRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn fetch_favorites(&self) -> Vec<MediaRecord> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .filter(|r| r.is_favorite)
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub async fn fetch_by_track_id(&self, track_id: i64) -> Option<MediaRecord> {
        let state = self.state.read().await;
        state.records.iter().find(|r| r.track_id == track_id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Return the stored record for `raw.track_id`, inserting a new one if absent.
    ///
    /// An existing record is returned as stored: its favorite flag and visit
    /// time survive a fresh search.
    pub async fn upsert(&self, raw: &RawMedia) -> MediaRecord {
        let mut state = self.state.write().await;
        if let Some(index) = state.position(raw.track_id) {
            return state.records[index].clone();
        }

        let record = MediaRecord::from_raw(raw, Utc::now());
        tracing::trace!(track_id = record.track_id, "Inserting media");
        state.records.push(record.clone());
        state.dirty = true;
        record
    }

    #[cfg(test)]
    pub async fn set_favorite(&self, track_id: i64, is_favorite: bool) -> StoreResult<MediaRecord> {
        let mut state = self.state.write().await;
        let record = state.get_mut(track_id)?;
        let changed = record.is_favorite != is_favorite;
        record.is_favorite = is_favorite;
        let record = record.clone();
        if changed {
            state.dirty = true;
        }
        Ok(record)
    }

    /// Flip the favorite flag and return the updated record
    pub async fn toggle_favorite(&self, track_id: i64) -> StoreResult<MediaRecord> {
        let mut state = self.state.write().await;
        let record = state.get_mut(track_id)?;
        record.is_favorite = !record.is_favorite;
        let record = record.clone();
        state.dirty = true;
        Ok(record)
    }

    pub async fn set_last_visit(&self, track_id: i64, at: DateTime<Utc>) -> StoreResult<MediaRecord> {
        let mut state = self.state.write().await;
        let record = state.get_mut(track_id)?;
        record.last_visit_at = Some(at);
        let record = record.clone();
        state.dirty = true;
        Ok(record)
    }

    #[cfg(test)]
    pub async fn delete(&self, track_id: i64) -> StoreResult<MediaRecord> {
        let mut state = self.state.write().await;
        let index = state
            .position(track_id)
            .ok_or(StoreError::NotFound { track_id })?;
        state.dirty = true;
        Ok(state.records.remove(index))
    }

    pub async fn has_changes(&self) -> bool {
        self.state.read().await.dirty
    }

    /// Commit pending changes to disk. A clean store is not rewritten.
    pub async fn save(&self) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.dirty {
            return Ok(());
        }

        if let Some(path) = self.path.as_deref() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            let content = serde_json::to_string_pretty(&state.records)?;
            tokio::fs::write(path, content).await?;
            tracing::debug!(count = state.records.len(), "Media store saved");
        }

        state.dirty = false;
        Ok(())
    }
}

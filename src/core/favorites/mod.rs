mod document;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;

use crate::{
    core::store::KeyValueStore,
    models::{FavoritesEntry, PlanId},
};

pub use document::{DocumentError, FAVORITES_SCHEMA_VERSION, FavoritesDocument};

/// Default slot name of the favorites collection.
pub const FAVORITES_KEY: &str = "plan_favorites";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesChangeKind {
    Added(PlanId),
    Removed(PlanId),
    Cleared,
}

/// Sent to the observer after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesChange {
    pub kind: FavoritesChangeKind,
    /// Number of favorites after the change.
    pub count: usize,
}

/// Receives favorites updates, typically to refresh the counter badge.
pub trait FavoritesObserver {
    fn favorites_changed(&self, change: &FavoritesChange);

    /// The store could not be read or written; the operation was a no-op.
    fn storage_failed(&self, _error: &anyhow::Error) {}
}

/// Favorited plans persisted in one slot of a [`KeyValueStore`].
///
/// Storage problems never reach the caller: they are logged, reported to the
/// observer, and the operation degrades to a no-op.
pub struct FavoritesStore<S> {
    storage: S,
    key: String,
    observer: Option<Arc<dyn FavoritesObserver>>,
    write_lock: Mutex<()>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .finish()
    }
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
            observer: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn set_observer(&mut self, observer: Arc<dyn FavoritesObserver>) {
        self.observer = Some(observer);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Favorites in insertion order. Empty when the slot is missing, unreadable
    /// or the store is unavailable.
    pub async fn list(&self) -> Vec<FavoritesEntry> {
        match self.read_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                self.report("list", e);
                Vec::new()
            }
        }
    }

    pub async fn count(&self) -> usize {
        self.list().await.len()
    }

    pub async fn is_favorited(&self, id: &PlanId) -> bool {
        self.list().await.iter().any(|entry| &entry.id == id)
    }

    /// Append `entry`. Returns `false` if its id is already present or it could not be saved.
    pub async fn add(&self, entry: FavoritesEntry) -> bool {
        let _guard = self.write_lock.lock().await;
        self.add_locked(entry).await
    }

    /// Remove the entry with `id`. Reports success even when it was not present.
    pub async fn remove(&self, id: &PlanId) -> bool {
        let _guard = self.write_lock.lock().await;
        self.remove_locked(id).await;
        true
    }

    /// Flip membership of `entry` and return the new state.
    pub async fn toggle(&self, entry: FavoritesEntry) -> bool {
        let _guard = self.write_lock.lock().await;
        let entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                self.report("toggle", e);
                return false;
            }
        };
        if entries.iter().any(|fav| fav.id == entry.id) {
            // Membership only changes if the write went through.
            !self.remove_locked(&entry.id).await
        } else {
            self.add_locked(entry).await
        }
    }

    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        match self.storage.remove_item(&self.key).await {
            Ok(()) => {
                tracing::debug!("favorites cleared");
                self.notify(FavoritesChangeKind::Cleared, 0);
            }
            Err(e) => self.report("clear", e),
        }
    }

    async fn add_locked(&self, entry: FavoritesEntry) -> bool {
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                self.report("add", e);
                return false;
            }
        };
        if entries.iter().any(|fav| fav.id == entry.id) {
            return false;
        }
        let id = entry.id.clone();
        entries.push(entry);
        let count = entries.len();
        match self.write_entries(entries).await {
            Ok(()) => {
                tracing::debug!(%id, "favorite added");
                self.notify(FavoritesChangeKind::Added(id), count);
                true
            }
            Err(e) => {
                self.report("add", e);
                false
            }
        }
    }

    /// Returns whether the slot was written.
    async fn remove_locked(&self, id: &PlanId) -> bool {
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                self.report("remove", e);
                return false;
            }
        };
        entries.retain(|fav| &fav.id != id);
        let count = entries.len();
        match self.write_entries(entries).await {
            Ok(()) => {
                tracing::debug!(%id, "favorite removed");
                self.notify(FavoritesChangeKind::Removed(id.clone()), count);
                true
            }
            Err(e) => {
                self.report("remove", e);
                false
            }
        }
    }

    /// Storage errors propagate; undecodable slot contents read as empty.
    async fn read_entries(&self) -> anyhow::Result<Vec<FavoritesEntry>> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };
        match FavoritesDocument::decode(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "ignoring unreadable favorites slot");
                Ok(Vec::new())
            }
        }
    }

    async fn write_entries(&self, entries: Vec<FavoritesEntry>) -> anyhow::Result<()> {
        let raw = FavoritesDocument::new(entries)
            .encode()
            .context("Failed to encode favorites")?;
        self.storage.set_item(&self.key, &raw).await
    }

    fn notify(&self, kind: FavoritesChangeKind, count: usize) {
        if let Some(observer) = &self.observer {
            observer.favorites_changed(&FavoritesChange { kind, count });
        }
    }

    fn report(&self, operation: &'static str, error: anyhow::Error) {
        tracing::error!(operation, error = %error, "favorites storage unavailable");
        if let Some(observer) = &self.observer {
            observer.storage_failed(&error);
        }
    }
}

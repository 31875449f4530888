mod sqlite;

use std::{collections::HashMap, path::Path};

use tokio::sync::Mutex;

pub use sqlite::SqliteStore;

/// Named string slots that outlive the session, the way a browser's local
/// storage does.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> impl Future<Output = anyhow::Result<Option<String>>>;
    fn set_item(&self, key: &str, value: &str) -> impl Future<Output = anyhow::Result<()>>;
    fn remove_item(&self, key: &str) -> impl Future<Output = anyhow::Result<()>>;
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a slot, e.g. with data written by an older version.
    pub fn with_item(key: &str, value: &str) -> Self {
        Self {
            items: Mutex::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.items.lock().await.remove(key);
        Ok(())
    }
}

/// The store the binary runs on: the SQLite file, or process memory when the
/// file cannot be opened.
#[derive(Debug)]
pub enum LocalStore {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl LocalStore {
    /// Open the SQLite store at `path`. On failure fall back to memory and
    /// hand the error back so it can be reported.
    pub async fn open_or_memory<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        match SqliteStore::open(path.as_ref()).await {
            Ok(store) => (LocalStore::Sqlite(store), None),
            Err(e) => {
                tracing::warn!(error = %e, "local store unavailable, favorites kept in memory");
                (LocalStore::Memory(MemoryStore::new()), Some(e))
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, LocalStore::Sqlite(_))
    }
}

impl KeyValueStore for LocalStore {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        match self {
            LocalStore::Sqlite(store) => store.get_item(key).await,
            LocalStore::Memory(store) => store.get_item(key).await,
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        match self {
            LocalStore::Sqlite(store) => store.set_item(key, value).await,
            LocalStore::Memory(store) => store.set_item(key, value).await,
        }
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        match self {
            LocalStore::Sqlite(store) => store.remove_item(key).await,
            LocalStore::Memory(store) => store.remove_item(key).await,
        }
    }
}

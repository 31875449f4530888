use std::path::{Path, PathBuf};

use anyhow::Context;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use super::KeyValueStore;

/// Key-value slots in a single SQLite table.
pub struct SqliteStore {
    path: Option<PathBuf>,
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SqliteStore {
    /// Open (creating if missing) the store file at `path` and apply migrations.
    pub async fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create store directory {:?}", parent))?;
        }

        let connect_opts = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_opts)
            .await
            .with_context(|| format!("Failed to open store {:?}", path))?;
        Self::migrate(&pool).await?;
        Ok(Self {
            path: Some(path),
            pool,
        })
    }

    /// Store backed by a private in-memory database.
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        // Every connection to :memory: is a separate database, so keep exactly one alive.
        let connect_opts: SqliteConnectOptions = "sqlite::memory:".parse()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self { path: None, pool })
    }

    async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .context("Failed to migrate store")?;
        Ok(())
    }

    /// Checkpoint the WAL and release the file handles.
    pub async fn close(self) -> anyhow::Result<()> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&self.pool)
            .await?;
        self.pool.close().await;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(r#"SELECT value FROM local_store WHERE key = $1"#)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read slot {:?}", key))?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO local_store (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value"#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write slot {:?}", key))?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM local_store WHERE key = $1"#)
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove slot {:?}", key))?;
        Ok(())
    }
}

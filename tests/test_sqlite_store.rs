//! Integration tests for the SQLite-backed local store.
//!
//! Tests cover:
//! - Slot get / set / overwrite / remove
//! - Favorites persisting across reopen of the same file

mod common;

use common::*;

#[tokio::test]
async fn test_set_get_remove_slot() -> anyhow::Result<()> {
    let store = SqliteStore::open_in_memory().await?;

    assert_eq!(store.get_item("slot").await?, None);

    store.set_item("slot", "first").await?;
    assert_eq!(store.get_item("slot").await?.as_deref(), Some("first"));

    store.set_item("slot", "second").await?;
    assert_eq!(store.get_item("slot").await?.as_deref(), Some("second"));

    store.remove_item("slot").await?;
    assert_eq!(store.get_item("slot").await?, None);

    // Removing a missing slot is fine
    store.remove_item("slot").await?;
    Ok(())
}

#[tokio::test]
async fn test_favorites_persist_across_reopen() -> anyhow::Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let store_path = temp_dir.path().join("nested").join("favorites.db");

    // 1. Save two favorites and close the store
    {
        let store = SqliteStore::open(&store_path).await?;
        let favorites = FavoritesStore::new(store);
        assert!(favorites.add(make_entry(1)).await);
        assert!(favorites.add(make_entry(2)).await);
        assert!(favorites.remove(&PlanId::Number(1)).await);
    }

    // 2. Reopen the same file
    let store = SqliteStore::open(&store_path).await?;
    let favorites = FavoritesStore::new(store);

    // 3. Only the remaining favorite is there
    let list = favorites.list().await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0], make_entry(2));

    favorites.clear().await;
    assert!(favorites.list().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_close_checkpoints_store() -> anyhow::Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let store_path = temp_dir.path().join("favorites.db");

    let store = SqliteStore::open(&store_path).await?;
    store.set_item("slot", "kept").await?;
    store.close().await?;

    let reopened = SqliteStore::open(&store_path).await?;
    assert_eq!(reopened.get_item("slot").await?.as_deref(), Some("kept"));
    Ok(())
}

#[tokio::test]
async fn test_unopenable_store_falls_back_to_memory() -> anyhow::Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file")?;

    // 1. A path below a regular file cannot be opened
    let (store, error) = LocalStore::open_or_memory(blocker.join("favorites.db")).await;
    assert!(!store.is_persistent());
    assert!(error.is_some());

    // 2. Favorites still work for the rest of the run
    let favorites = FavoritesStore::new(store);
    assert!(favorites.add(make_entry(1)).await);
    assert!(favorites.is_favorited(&PlanId::Number(1)).await);

    // 3. A good path opens the file store
    let (store, error) = LocalStore::open_or_memory(temp_dir.path().join("favorites.db")).await;
    assert!(store.is_persistent());
    assert!(error.is_none());
    Ok(())
}

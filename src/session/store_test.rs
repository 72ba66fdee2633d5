use super::*;
use crate::session::UserRecord;
use tempfile::TempDir;

fn scratch_path(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join(name);
    (dir, path)
}

// =============================================================================
// MemoryStore
// =============================================================================

#[tokio::test]
async fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k").await.unwrap(), None);

    store.set("k", "v1").await.unwrap();
    store.set("k", "v2").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some("v2".to_owned()));

    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn memory_store_remove_missing_key_is_ok() {
    let store = MemoryStore::new();
    assert!(store.remove("missing").await.is_ok());
}

// =============================================================================
// FileStore
// =============================================================================

#[tokio::test]
async fn file_store_missing_file_reads_as_empty() {
    let (_dir, path) = scratch_path("absent.json");
    let store = FileStore::new(path);
    assert_eq!(store.get("pb_auth").await.unwrap(), None);
}

#[tokio::test]
async fn file_store_persists_across_instances() {
    let (_dir, path) = scratch_path("session.json");
    FileStore::new(&path).set("pb_auth", "blob").await.unwrap();
    FileStore::new(&path).set("other", "x").await.unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("pb_auth").await.unwrap(), Some("blob".to_owned()));
    assert_eq!(reopened.get("other").await.unwrap(), Some("x".to_owned()));

    reopened.remove("pb_auth").await.unwrap();
    assert_eq!(FileStore::new(&path).get("pb_auth").await.unwrap(), None);
    assert_eq!(FileStore::new(&path).get("other").await.unwrap(), Some("x".to_owned()));
}

#[tokio::test]
async fn file_store_corrupt_file_is_reported() {
    let (_dir, path) = scratch_path("corrupt.json");
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&path, "{oops").await.unwrap();

    let err = FileStore::new(&path).get("pb_auth").await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt(_)));
    assert_eq!(err.error_code(), "E_STORAGE_CORRUPT");
}

// =============================================================================
// SessionSlot
// =============================================================================

#[tokio::test]
async fn slot_round_trips_session() {
    let slot = SessionSlot::new(Arc::new(MemoryStore::new()), "pb_auth");
    assert_eq!(slot.load().await.unwrap(), None);

    let user = UserRecord { id: "u1".into(), ..UserRecord::default() };
    let session = Session::new("tok", Some(user));
    slot.save(&session).await.unwrap();
    assert_eq!(slot.load().await.unwrap(), Some(session));

    slot.clear().await.unwrap();
    assert_eq!(slot.load().await.unwrap(), None);
}

#[tokio::test]
async fn slot_reports_unreadable_blob() {
    let store = Arc::new(MemoryStore::new());
    store.set("pb_auth", "garbage").await.unwrap();
    let slot = SessionSlot::new(store, "pb_auth");
    assert!(matches!(slot.load().await, Err(StorageError::Corrupt(_))));
}

use super::*;

#[test]
fn memory_storage_set_get_remove() {
    let store = MemoryStorage::new();
    assert!(store.get("k").is_none());
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("v"));
    store.remove("k");
    assert!(store.get("k").is_none());
    assert!(store.is_empty());
}

#[test]
fn memory_storage_clones_share_entries() {
    let a = MemoryStorage::new();
    let b = a.clone();
    a.set("shared", "1").unwrap();
    assert_eq!(b.get("shared").as_deref(), Some("1"));
    assert_eq!(b.len(), 1);
}

#[test]
fn json_helpers_round_trip_and_reject_garbage() {
    let store = MemoryStorage::new();
    save_json(&store, "flag", &true).unwrap();
    assert_eq!(load_json::<bool>(&store, "flag"), Some(true));

    store.set("flag", "not-json").unwrap();
    assert_eq!(load_json::<bool>(&store, "flag"), None);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_storage_is_inert_outside_browser() {
    let store = BrowserStorage;
    assert!(store.get("token").is_none());
    assert_eq!(store.set("token", "x"), Err(StorageError::Unavailable));
    store.remove("token");
}

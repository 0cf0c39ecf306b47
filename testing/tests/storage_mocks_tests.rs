//! Tests for key-value store testing utilities

#![allow(clippy::unwrap_used, clippy::panic)] // Tests can unwrap and panic

use checklist_core::storage::{KeyValueStore, StorageError};
use checklist_testing::{FailingStore, InMemoryStore};
use std::sync::Arc;

#[test]
fn test_inmemory_store_set_and_get() {
    let store = InMemoryStore::new();

    assert_eq!(store.get("todos").unwrap(), None);
    assert!(!store.contains("todos").unwrap());

    store.set("todos", "[]").unwrap();

    assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
    assert!(store.contains("todos").unwrap());
}

#[test]
fn test_inmemory_store_replaces_whole_value() {
    let store = InMemoryStore::new();

    store.set("todos", "[1]").unwrap();
    store.set("todos", "[2]").unwrap();

    assert_eq!(store.value("todos").as_deref(), Some("[2]"));
    assert_eq!(store.write_count(), 2);
}

#[test]
fn test_inmemory_store_priming_is_not_a_write() {
    let store = InMemoryStore::new().with_value("todos", "not json");

    assert_eq!(store.value("todos").as_deref(), Some("not json"));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_inmemory_store_remove() {
    let store = InMemoryStore::new().with_value("todos", "[]");

    store.remove("todos").unwrap();
    store.remove("todos").unwrap();

    assert_eq!(store.get("todos").unwrap(), None);
}

#[test]
fn test_inmemory_store_clones_share_data() {
    let store = InMemoryStore::new();
    let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());

    shared.set("todos", "[]").unwrap();

    assert_eq!(store.writes(), vec![("todos".to_string(), "[]".to_string())]);

    store.clear();
    assert_eq!(shared.get("todos").unwrap(), None);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_inmemory_store_validates_keys() {
    let store = InMemoryStore::new();

    assert!(matches!(
        store.set("../escape", "[]"),
        Err(StorageError::InvalidKey { .. })
    ));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_failing_store_fails_everything() {
    let store = FailingStore::new("disk on fire");

    for result in [
        store.get("todos").map(|_| ()),
        store.set("todos", "[]"),
        store.remove("todos"),
    ] {
        match result {
            Err(StorageError::Backend(message)) => assert_eq!(message, "disk on fire"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}

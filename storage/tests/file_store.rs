//! Integration tests for the file-backed store

#![allow(clippy::unwrap_used)] // Tests can unwrap

use checklist_core::storage::{KeyValueStore, StorageError};
use checklist_storage::FileStore;

#[test]
fn absent_key_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    assert_eq!(store.get("todos").unwrap(), None);
    assert!(!store.contains("todos").unwrap());
}

#[test]
fn value_survives_a_fresh_instance() {
    let dir = tempfile::tempdir().unwrap();

    FileStore::new(dir.path())
        .set("todos", r#"[{"id":1,"text":"Buy milk","done":false}]"#)
        .unwrap();

    let reopened = FileStore::new(dir.path());
    assert_eq!(
        reopened.get("todos").unwrap().as_deref(),
        Some(r#"[{"id":1,"text":"Buy milk","done":false}]"#)
    );
}

#[test]
fn set_replaces_the_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.set("todos", "[1,2,3]").unwrap();
    store.set("todos", "[]").unwrap();

    assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
}

#[test]
fn set_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = FileStore::new(&nested);

    store.set("todos", "[]").unwrap();

    assert!(nested.join("todos.json").is_file());
}

#[test]
fn set_leaves_no_temp_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.set("todos", "[]").unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["todos.json".to_string()]);
}

#[test]
fn keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.set("todos", "[]").unwrap();
    store.set("archive", "[1]").unwrap();
    store.remove("archive").unwrap();

    assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
    assert_eq!(store.get("archive").unwrap(), None);
}

#[test]
fn removing_an_absent_key_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    assert!(store.remove("todos").is_ok());
}

#[test]
fn invalid_keys_never_touch_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("data"));

    assert!(matches!(
        store.set("../outside", "[]"),
        Err(StorageError::InvalidKey { .. })
    ));
    assert!(!dir.path().join("data").exists());
    assert!(!dir.path().join("outside.json").exists());
}

#[test]
fn unreadable_slot_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    // A directory where the value file should be
    std::fs::create_dir(dir.path().join("todos.json")).unwrap();

    assert!(matches!(store.get("todos"), Err(StorageError::Io(_))));
}

//! In-memory key-value stores for testing persistence
//!
//! - [`InMemoryStore`]: `HashMap`-backed slot storage that logs every write
//! - [`FailingStore`]: a backend that is always unavailable

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Only panics on a poisoned lock

use checklist_core::storage::{KeyValueStore, Result, StorageError, validate_key};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory key-value store for fast, deterministic testing.
///
/// Clones share the same data, so a test can keep one handle for assertions
/// while the environment owns another. Values primed with
/// [`InMemoryStore::with_value`] do not appear in the write log.
///
/// # Example
///
/// ```
/// use checklist_testing::InMemoryStore;
/// use checklist_core::storage::KeyValueStore;
///
/// let store = InMemoryStore::new().with_value("todos", "not json");
/// assert_eq!(store.get("todos").unwrap().as_deref(), Some("not json"));
///
/// store.set("todos", "[]").unwrap();
/// assert_eq!(store.write_count(), 1);
/// assert_eq!(store.writes(), vec![("todos".to_string(), "[]".to_string())]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<Vec<(String, String)>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value without recording a write
    #[must_use]
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Current raw value under `key`
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.data.read().unwrap().get(key).cloned()
    }

    /// Number of successful `set` calls so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.read().unwrap().len()
    }

    /// Every `(key, value)` written, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.read().unwrap().clone()
    }

    /// Clear data and the write log (for test isolation)
    pub fn clear(&self) {
        self.data.write().unwrap().clear();
        self.writes.write().unwrap().clear();
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes
            .write()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.data.write().unwrap().remove(key);
        Ok(())
    }
}

/// A key-value store whose backend is always unavailable.
///
/// Every operation returns [`StorageError::Backend`] with the configured
/// message.
#[derive(Clone, Debug)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    /// Create a failing store reporting `message`
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(StorageError::Backend(self.message.clone()))
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("storage unavailable")
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        self.fail()
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.fail()
    }

    fn remove(&self, _key: &str) -> Result<()> {
        self.fail()
    }
}

//! Key-value storage for persisted state.
//!
//! A *slot* is a single named location in durable local storage. Features
//! keep their whole serialized state under one key and replace it wholesale on
//! every write, the same contract a browser's `localStorage` offers.
//!
//! Reads and writes are synchronous: slots are small, local and written once
//! per user action.
//!
//! ## Example
//!
//! ```ignore
//! struct TodoSlot {
//!     store: Arc<dyn KeyValueStore>,
//!     key: String,
//! }
//!
//! impl TodoSlot {
//!     fn save(&self, todos: &[TodoItem]) -> Result<()> {
//!         let value = serde_json::to_string(todos)?;
//!         self.store.set(&self.key, &value)
//!     }
//! }
//! ```

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key cannot be used by this backend
    #[error("Invalid storage key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why the key was rejected
        reason: &'static str,
    },

    /// Filesystem error
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A string-valued key-value store.
///
/// Implementations must give last-writer-wins, full-replacement semantics:
/// after `set(k, v)` returns `Ok`, `get(k)` yields exactly `v` until the next
/// `set` or `remove` of the same key.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Some(value)` if the key holds a value
    /// - `None` if the key was never written or has been removed
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is invalid or the backend fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is invalid or the backend fails.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is invalid or the backend fails.
    fn remove(&self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value.
    ///
    /// Default implementation uses [`KeyValueStore::get`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is invalid or the backend fails.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Validate a slot key.
///
/// Keys are non-empty, at most 128 bytes, made of ASCII alphanumerics, `-`,
/// `_` and `.`, and never start with `.`. Backends that map keys onto file
/// names rely on this to stay inside their directory.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] describing the first violated rule.
///
/// # Example
///
/// ```
/// use checklist_core::storage::validate_key;
///
/// assert!(validate_key("todos").is_ok());
/// assert!(validate_key("../etc/passwd").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<()> {
    let reject = |reason| {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };

    if key.is_empty() {
        return reject("key is empty");
    }
    if key.len() > 128 {
        return reject("key is longer than 128 bytes");
    }
    if key.starts_with('.') {
        return reject("key starts with '.'");
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        return reject("key contains characters outside [A-Za-z0-9._-]");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_keys() {
        for key in ["todos", "todo-list", "todos_v1", "a.b", "X9"] {
            assert!(validate_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn rejects_unsafe_keys() {
        for key in ["", ".hidden", "a/b", "..", "with space", "ünicode"] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey { .. })),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overlong_keys() {
        let key = "k".repeat(129);
        assert!(validate_key(&key).is_err());
        assert!(validate_key(&key[..128]).is_ok());
    }
}

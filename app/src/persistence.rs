//! The persistence slot holding the serialized todo list.
//!
//! The slot value is a JSON array of `{"id", "text", "done"}` objects and is
//! always replaced wholesale. There is no version field.

use crate::types::{TodoId, TodoItem};
use checklist_core::storage::{KeyValueStore, StorageError};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Slot key used when none is configured
pub const DEFAULT_SLOT_KEY: &str = "todos";

/// The slot value could not be encoded or decoded
#[derive(Debug, thiserror::Error)]
#[error("Malformed todo list: {0}")]
pub struct CodecError(#[from] serde_json::Error);

/// Error type for slot operations
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    /// The backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The value is not a todo list
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Serialize the full collection
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode(todos: &[TodoItem]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(todos)?)
}

/// Parse a slot value
///
/// Items whose text is blank are dropped and texts are trimmed. When ids
/// repeat, the first item wins. Both are logged.
///
/// # Errors
///
/// Returns [`CodecError`] if `value` is not a JSON array of todo items.
pub fn decode(value: &str) -> Result<Vec<TodoItem>, CodecError> {
    let todos: Vec<TodoItem> = serde_json::from_str(value)?;
    Ok(sanitize(todos))
}

fn sanitize(todos: Vec<TodoItem>) -> Vec<TodoItem> {
    let total = todos.len();
    let mut seen: HashSet<TodoId> = HashSet::with_capacity(total);

    let kept: Vec<TodoItem> = todos
        .into_iter()
        .filter_map(|mut item| {
            let trimmed = item.text.trim();
            if trimmed.is_empty() || !seen.insert(item.id) {
                return None;
            }
            if trimmed.len() != item.text.len() {
                item.text = trimmed.to_string();
            }
            Some(item)
        })
        .collect();

    if kept.len() < total {
        tracing::warn!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "Dropped blank or duplicate todos from slot"
        );
    }
    kept
}

/// Named slot in a [`KeyValueStore`] holding the todo list
#[derive(Clone)]
pub struct TodoSlot {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl TodoSlot {
    /// Bind `key` in `store`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The slot key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted list, reporting why it could not be read
    ///
    /// An absent slot is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError`] if the backend fails or the value is malformed.
    pub fn try_load(&self) -> Result<Vec<TodoItem>, SlotError> {
        match self.store.get(&self.key)? {
            Some(value) => Ok(decode(&value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Read the persisted list
    ///
    /// Never fails: an unreadable or malformed slot is logged and read as an
    /// empty list. The slot itself is left untouched.
    #[must_use]
    pub fn load(&self) -> Vec<TodoItem> {
        match self.try_load() {
            Ok(todos) => {
                tracing::debug!(key = %self.key, count = todos.len(), "Loaded todo list");
                todos
            },
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Ignoring unreadable todo list");
                Vec::new()
            },
        }
    }

    /// Replace the persisted list with `todos`
    ///
    /// # Errors
    ///
    /// Returns [`SlotError`] if encoding or the write fails.
    pub fn save(&self, todos: &[TodoItem]) -> Result<(), SlotError> {
        let value = encode(todos)?;
        self.store.set(&self.key, &value)?;
        tracing::debug!(key = %self.key, count = todos.len(), "Saved todo list");
        Ok(())
    }
}

impl fmt::Debug for TodoSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoSlot")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

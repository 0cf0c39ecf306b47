//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items that can be added,
//! toggled and removed. The collection keeps insertion order; no operation
//! reorders it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a todo item
///
/// Ids are creation timestamps in milliseconds since the Unix epoch, bumped
/// past the largest id already in the collection when the clock has not
/// moved on. Serialized as a bare JSON number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Creates a `TodoId` from a millisecond timestamp
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the inner millisecond value
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single todo item
///
/// The field names are the persisted wire format:
/// `{"id": number, "text": string, "done": bool}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing (trimmed, never blank)
    pub text: String,
    /// Whether the todo is completed
    pub done: bool,
}

impl TodoItem {
    /// Creates a new, not yet completed todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            done: false,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// Which subset of the list a view shows
///
/// Transient view state; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not yet done
    Active,
    /// Items marked done
    Completed,
}

impl Filter {
    /// All selectors, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `item` belongs to this subset
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.done,
            Self::Completed => item.done,
        }
    }

    /// Human-facing label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown filter name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter {0:?} (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Lazy view over the items matching a [`Filter`]
///
/// Cheap to clone; clones iterate independently, so the same view can be
/// walked more than once.
#[derive(Clone, Debug)]
pub struct Filtered<'a> {
    items: std::slice::Iter<'a, TodoItem>,
    filter: Filter,
}

impl<'a> Iterator for Filtered<'a> {
    type Item = &'a TodoItem;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.items.find(|item| filter.matches(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// State of the todo list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: Vec<TodoItem>,
    /// Whether the persisted list has been loaded
    pub hydrated: bool,
    /// Last rejected intent (if any)
    pub last_error: Option<String>,
    /// Last failed write to the persistence slot (cleared by the next good write)
    pub persistence_error: Option<String>,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            hydrated: false,
            last_error: None,
            persistence_error: None,
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of todos not yet done
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.filtered(Filter::Active).count()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.filtered(Filter::Completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Items matching `filter`, in collection order
    ///
    /// Pure and O(n); reflects the collection as it is now.
    #[must_use]
    pub fn filtered(&self, filter: Filter) -> Filtered<'_> {
        Filtered {
            items: self.todos.iter(),
            filter,
        }
    }
}

/// Actions for the todo list
///
/// Intents come from the controller; the remaining variants are fed back by
/// persistence effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Intents ==========
    /// Read the persisted list (once, at startup)
    Load,

    /// Append a new todo
    Add {
        /// Raw text as typed; trimmed by the reducer
        text: String,
    },

    /// Flip a todo's completion flag
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },

    /// Delete a todo
    Remove {
        /// Todo to delete
        id: TodoId,
    },

    // ========== Effect outcomes ==========
    /// The persisted list was read (empty when absent or unreadable)
    Hydrated {
        /// Items to install as the collection
        todos: Vec<TodoItem>,
    },

    /// The full list was written to the slot
    Saved,

    /// Writing the slot failed; memory is kept as is
    SaveFailed {
        /// Error message
        error: String,
    },
}

impl TodoAction {
    /// Returns true for intents that edit the collection (and so write the slot)
    ///
    /// These wait for the persisted list to be loaded first.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Add { .. } | Self::Toggle { .. } | Self::Remove { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    fn item(id: i64, text: &str, done: bool) -> TodoItem {
        TodoItem {
            id: TodoId::from_millis(id),
            text: text.to_string(),
            done,
        }
    }

    fn sample_state() -> TodoState {
        TodoState {
            todos: vec![
                item(1, "Buy milk", false),
                item(2, "Walk dog", true),
                item(3, "Write report", false),
            ],
            ..TodoState::new()
        }
    }

    #[test]
    fn todo_id_display_and_parse() {
        let id = TodoId::from_millis(1_735_689_600_000);
        assert_eq!(id.to_string(), "1735689600000");
        assert_eq!(" 1735689600000 ".parse::<TodoId>().unwrap(), id);
        assert!("abc".parse::<TodoId>().is_err());
    }

    #[test]
    fn todo_item_wire_format() {
        let json = serde_json::to_string(&item(7, "Buy milk", true)).unwrap();
        assert_eq!(json, r#"{"id":7,"text":"Buy milk","done":true}"#);
    }

    #[test]
    fn todo_item_toggle() {
        let mut todo = TodoItem::new(TodoId::from_millis(1), "Test".to_string());
        assert!(!todo.done);
        todo.toggle();
        assert!(todo.done);
        todo.toggle();
        assert!(!todo.done);
    }

    #[test]
    fn filter_parse_is_case_insensitive() {
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!(" completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert_eq!("ALL".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(
            "done".parse::<Filter>(),
            Err(ParseFilterError("done".to_string()))
        );
    }

    #[test]
    fn filter_display_round_trips() {
        for filter in Filter::ALL {
            assert_eq!(filter.to_string().parse::<Filter>().unwrap(), filter);
        }
    }

    #[test]
    fn filtered_keeps_collection_order() {
        let state = sample_state();
        let active: Vec<_> = state.filtered(Filter::Active).map(|t| t.id.as_millis()).collect();
        let completed: Vec<_> = state.filtered(Filter::Completed).map(|t| t.id.as_millis()).collect();
        let all: Vec<_> = state.filtered(Filter::All).map(|t| t.id.as_millis()).collect();

        assert_eq!(active, vec![1, 3]);
        assert_eq!(completed, vec![2]);
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn filtered_is_restartable() {
        let state = sample_state();
        let view = state.filtered(Filter::Active);

        assert_eq!(view.clone().count(), 2);
        assert_eq!(view.clone().count(), 2);
        assert_eq!(view.map(|t| t.text.as_str()).collect::<Vec<_>>(), vec!["Buy milk", "Write report"]);
    }

    #[test]
    fn counts() {
        let state = sample_state();
        assert_eq!(state.count(), 3);
        assert_eq!(state.active_count(), 2);
        assert_eq!(state.completed_count(), 1);
        assert!(state.exists(TodoId::from_millis(2)));
        assert!(!state.exists(TodoId::from_millis(9)));
    }

    #[test]
    fn mutation_classification() {
        assert!(TodoAction::Add { text: "x".into() }.is_mutation());
        assert!(TodoAction::Remove { id: TodoId::from_millis(1) }.is_mutation());
        assert!(!TodoAction::Hydrated { todos: vec![] }.is_mutation());
        assert!(!TodoAction::Load.is_mutation());
        assert!(!TodoAction::Saved.is_mutation());
    }
}

//! View/controller for the todo list.
//!
//! The controller owns the transient view state (panel, draft, filter) and
//! turns user intents into Store actions. Every intent answers with a
//! [`Notice`]: an advisory message the front end may show and then forget.

use crate::persistence::TodoSlot;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Filter, TodoAction, TodoId, TodoItem, TodoState};
use checklist_core::environment::Clock;
use checklist_core::storage::KeyValueStore;
use checklist_runtime::{Store, StoreError};
use std::fmt;
use std::sync::Arc;

/// The Store specialised to the todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Draft validation message shown next to the input
pub const DRAFT_REQUIRED: &str = "Input is required";

/// Shown when the whole collection is empty
pub const EMPTY_LIST_MESSAGE: &str = "Nothing has been added yet.";

/// Shown when items exist but none match the filter
pub const NO_MATCHES_MESSAGE: &str = "There are no tasks matching this filter.";

/// Build a Store persisting to `key` in `backend`
///
/// The Store starts empty; send [`TodoAction::Load`] (or call
/// [`TodoController::start`]) to read the persisted list.
#[must_use]
pub fn open_store(
    clock: Arc<dyn Clock>,
    backend: Arc<dyn KeyValueStore>,
    key: impl Into<String>,
) -> TodoStore {
    let env = TodoEnvironment::new(clock, TodoSlot::new(backend, key));
    Store::new(TodoState::new(), TodoReducer::new(), env)
}

/// Severity of a [`Notice`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// The intent succeeded
    Success,
    /// Something changed
    Info,
    /// Something was removed
    Warning,
    /// The intent was rejected
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "ok",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        })
    }
}

/// Advisory, user-facing status message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Message text
    pub message: &'static str,
}

impl Notice {
    /// Returned by a valid submit
    pub const ADDED: Self = Self::new(NoticeLevel::Success, "Todo added successfully");
    /// Returned by an empty submit
    pub const EMPTY: Self = Self::new(NoticeLevel::Error, "Cannot add empty todo");
    /// Returned by a toggle
    pub const TOGGLED: Self = Self::new(NoticeLevel::Info, "Todo status updated");
    /// Returned by a delete
    pub const DELETED: Self = Self::new(NoticeLevel::Warning, "Todo deleted");

    const fn new(level: NoticeLevel, message: &'static str) -> Self {
        Self { level, message }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Transient view state; never persisted
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Whether the add panel is open
    pub panel_open: bool,
    /// Text typed into the add panel
    pub draft: String,
    /// Validation message for the draft
    pub draft_error: Option<&'static str>,
    /// Subset shown by the list
    pub filter: Filter,
}

/// Everything a front end needs to draw one frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    /// Items matching the current filter, in collection order
    pub items: Vec<TodoItem>,
    /// Current filter
    pub filter: Filter,
    /// Size of the whole collection
    pub total: usize,
    /// Items not yet done
    pub active: usize,
    /// Items done
    pub completed: usize,
    /// Placeholder when `items` is empty
    pub empty_message: Option<&'static str>,
    /// Last failed write, if the list on disk is stale
    pub persistence_error: Option<String>,
    /// Panel, draft and draft error
    pub view: ViewState,
}

fn empty_message_for(state: &TodoState, filter: Filter) -> Option<&'static str> {
    if state.count() == 0 {
        Some(EMPTY_LIST_MESSAGE)
    } else if state.filtered(filter).next().is_none() {
        Some(NO_MATCHES_MESSAGE)
    } else {
        None
    }
}

/// Turns user intents into Store actions and keeps the view state
#[derive(Clone)]
pub struct TodoController {
    store: TodoStore,
    view: ViewState,
}

impl TodoController {
    /// Wrap `store` with a closed panel, an empty draft and the `All` filter
    #[must_use]
    pub fn new(store: TodoStore) -> Self {
        Self {
            store,
            view: ViewState::default(),
        }
    }

    /// The underlying Store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Current view state
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Load the persisted list
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Store rejects the action.
    pub async fn start(&self) -> Result<(), StoreError> {
        self.store.send(TodoAction::Load).await?;
        Ok(())
    }

    /// Replace the draft text and clear its validation message
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.view.draft = text.into();
        self.view.draft_error = None;
    }

    /// Open the add panel
    pub fn open_panel(&mut self) {
        self.view.panel_open = true;
    }

    /// Close the add panel, discarding the draft's validation message
    pub fn close_panel(&mut self) {
        self.view.panel_open = false;
        self.view.draft_error = None;
    }

    /// Open the panel if closed, close it if open
    pub fn toggle_panel(&mut self) {
        if self.view.panel_open {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Change what the list shows; never touches the Store
    pub fn set_filter(&mut self, filter: Filter) {
        self.view.filter = filter;
    }

    /// Submit the draft as a new todo
    ///
    /// An empty draft sets [`DRAFT_REQUIRED`] and keeps the panel as is.
    /// A valid one is added, the draft cleared and the panel closed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Store rejects the action.
    pub async fn submit(&mut self) -> Result<Notice, StoreError> {
        if self.view.draft.trim().is_empty() {
            self.view.draft_error = Some(DRAFT_REQUIRED);
            return Ok(Notice::EMPTY);
        }

        // The draft stays put if the Store refuses the add
        let text = self.view.draft.clone();
        self.store.send(TodoAction::Add { text }).await?;
        self.view.draft.clear();
        self.view.draft_error = None;
        self.view.panel_open = false;
        Ok(Notice::ADDED)
    }

    /// Flip a todo's completion flag
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Store rejects the action.
    pub async fn toggle(&self, id: TodoId) -> Result<Notice, StoreError> {
        self.store.send(TodoAction::Toggle { id }).await?;
        Ok(Notice::TOGGLED)
    }

    /// Delete a todo
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Store rejects the action.
    pub async fn delete(&self, id: TodoId) -> Result<Notice, StoreError> {
        self.store.send(TodoAction::Remove { id }).await?;
        Ok(Notice::DELETED)
    }

    /// Items matching the current filter
    pub async fn visible(&self) -> Vec<TodoItem> {
        let filter = self.view.filter;
        self.store
            .state(|state| state.filtered(filter).cloned().collect())
            .await
    }

    /// Placeholder to show instead of an empty list
    pub async fn empty_message(&self) -> Option<&'static str> {
        let filter = self.view.filter;
        self.store
            .state(|state| empty_message_for(state, filter))
            .await
    }

    /// Snapshot of everything needed to render
    pub async fn view_model(&self) -> ViewModel {
        let view = self.view.clone();
        self.store
            .state(|state| ViewModel {
                items: state.filtered(view.filter).cloned().collect(),
                filter: view.filter,
                total: state.count(),
                active: state.active_count(),
                completed: state.completed_count(),
                empty_message: empty_message_for(state, view.filter),
                persistence_error: state.persistence_error.clone(),
                view,
            })
            .await
    }
}

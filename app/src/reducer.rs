//! Reducer logic for the todo list.
//!
//! Intents are validated and applied in place. Every successful mutation
//! returns exactly one effect writing the whole list to the slot; rejected
//! intents and no-ops return none. An edit arriving before the list has been
//! loaded is deferred until after the load.

use crate::persistence::TodoSlot;
use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use checklist_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::collections::HashSet;
use std::sync::Arc;

/// Message recorded when an add is rejected
pub const EMPTY_TEXT_ERROR: &str = "Todo text cannot be empty";

/// Message recorded when no id is left to hand out
pub const NO_FREE_ID_ERROR: &str = "No free todo id left";

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating ids
    pub clock: Arc<dyn Clock>,
    /// Where the list is persisted
    pub slot: TodoSlot,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, slot: TodoSlot) -> Self {
        Self { clock, slot }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Fresh id: the clock in milliseconds, bumped past every existing id
    ///
    /// Once the largest id is `i64::MAX` nothing can be bumped past it, so
    /// the largest free id below it is used instead. `None` only when every
    /// id is taken.
    fn next_id(state: &TodoState, clock: &dyn Clock) -> Option<TodoId> {
        let now = clock.now().timestamp_millis();
        let Some(highest) = state.todos.iter().map(|todo| todo.id.as_millis()).max() else {
            return Some(TodoId::from_millis(now));
        };
        if highest < now {
            return Some(TodoId::from_millis(now));
        }
        if let Some(next) = highest.checked_add(1) {
            return Some(TodoId::from_millis(next));
        }

        let taken: HashSet<i64> = state.todos.iter().map(|todo| todo.id.as_millis()).collect();
        (i64::MIN..i64::MAX)
            .rev()
            .find(|id| !taken.contains(id))
            .map(TodoId::from_millis)
    }

    fn load_effect(env: &TodoEnvironment) -> Effect<TodoAction> {
        let slot = env.slot.clone();
        Effect::future(async move {
            Some(TodoAction::Hydrated {
                todos: slot.load(),
            })
        })
    }

    fn save_effect(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let slot = env.slot.clone();
        let todos = state.todos.clone();
        Effect::future(async move {
            match slot.save(&todos) {
                Ok(()) => Some(TodoAction::Saved),
                Err(error) => {
                    tracing::warn!(key = slot.key(), %error, "Failed to save todo list");
                    Some(TodoAction::SaveFailed {
                        error: error.to_string(),
                    })
                },
            }
        })
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // Edits made before the persisted list is in memory would overwrite
        // it on save: load first, then replay the intent.
        if action.is_mutation() && !state.hydrated {
            tracing::debug!(?action, "Loading todo list before first edit");
            return smallvec![Effect::chain(vec![
                Self::load_effect(env),
                Effect::future(async move { Some(action) }),
            ])];
        }

        match action {
            // ========== Intents ==========
            TodoAction::Load => {
                if state.hydrated {
                    tracing::debug!("Todo list already loaded");
                    return SmallVec::new();
                }
                smallvec![Self::load_effect(env)]
            },

            TodoAction::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    state.last_error = Some(EMPTY_TEXT_ERROR.to_string());
                    return SmallVec::new();
                }

                let Some(id) = Self::next_id(state, env.clock.as_ref()) else {
                    state.last_error = Some(NO_FREE_ID_ERROR.to_string());
                    return SmallVec::new();
                };
                state.todos.push(TodoItem::new(id, text.to_string()));
                state.last_error = None;
                tracing::debug!(%id, "Added todo");

                smallvec![Self::save_effect(state, env)]
            },

            TodoAction::Toggle { id } => {
                let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == id) else {
                    tracing::debug!(%id, "Toggle of unknown todo ignored");
                    return SmallVec::new();
                };
                todo.toggle();
                state.last_error = None;

                smallvec![Self::save_effect(state, env)]
            },

            TodoAction::Remove { id } => {
                let before = state.todos.len();
                state.todos.retain(|todo| todo.id != id);
                if state.todos.len() == before {
                    tracing::debug!(%id, "Remove of unknown todo ignored");
                    return SmallVec::new();
                }
                state.last_error = None;

                smallvec![Self::save_effect(state, env)]
            },

            // ========== Effect outcomes ==========
            TodoAction::Hydrated { todos } => {
                state.todos = todos;
                state.hydrated = true;
                SmallVec::new()
            },

            TodoAction::Saved => {
                state.persistence_error = None;
                SmallVec::new()
            },

            TodoAction::SaveFailed { error } => {
                state.persistence_error = Some(error);
                SmallVec::new()
            },
        }
    }
}

//! # Checklist
//!
//! A locally persisted todo list built on the Checklist architecture.
//!
//! The list lives in a single key-value slot and is rewritten in full after
//! every successful mutation:
//!
//! - **State**: [`TodoState`]: ordered items plus the last diagnostics
//! - **Actions**: [`TodoAction`]: `Load`, `Add`, `Toggle`, `Remove` and the
//!   persistence outcomes fed back by effects
//! - **Reducer**: [`TodoReducer`]: validates, mutates, describes the write
//! - **Controller**: [`TodoController`]: view state and user-facing notices
//!
//! ## Example
//!
//! ```ignore
//! let store = open_store(Arc::new(SystemClock), Arc::new(FileStore::new(".checklist")), "todos");
//! let mut controller = TodoController::new(store);
//! controller.start().await?;
//!
//! controller.set_draft("Buy milk");
//! let notice = controller.submit().await?;
//! assert_eq!(notice, Notice::ADDED);
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod persistence;
pub mod reducer;
pub mod shell;
pub mod types;
pub mod view;

pub use command::{Command, CommandError};
pub use config::{Config, ConfigError};
pub use controller::{
    Notice, NoticeLevel, TodoController, TodoStore, ViewModel, ViewState, open_store,
};
pub use persistence::{CodecError, SlotError, TodoSlot};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use shell::{Reply, Shell, ShellError};
pub use types::{Filter, Filtered, ParseFilterError, TodoAction, TodoId, TodoItem, TodoState};

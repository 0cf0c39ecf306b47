//! File-backed slot storage for Checklist.
//!
//! This crate provides [`FileStore`], an implementation of the
//! [`KeyValueStore`](checklist_core::storage::KeyValueStore) trait from
//! `checklist-core` that keeps one file per key inside a data directory:
//!
//! - `<dir>/<key>.json` holds the current value
//! - Writes go to a hidden temporary file first and are renamed into place,
//!   so readers never observe a half-written value
//! - The directory is created on first write
//!
//! # Example
//!
//! ```no_run
//! use checklist_core::storage::KeyValueStore;
//! use checklist_storage::FileStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new(".checklist");
//! store.set("todos", "[]")?;
//! assert_eq!(store.get("todos")?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod file;

pub use file::FileStore;

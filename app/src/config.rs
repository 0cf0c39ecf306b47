//! Configuration for the checklist binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary loads a `.env` file first, if there is one.

use crate::persistence::DEFAULT_SLOT_KEY;
use checklist_core::storage::{StorageError, validate_key};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Directory holding the slot files
pub const DATA_DIR_VAR: &str = "CHECKLIST_DATA_DIR";
/// Key of the todo list slot
pub const SLOT_KEY_VAR: &str = "CHECKLIST_SLOT_KEY";
/// Fallback log filter directives
pub const LOG_FILTER_VAR: &str = "CHECKLIST_LOG_FILTER";
/// Log filter directives that take precedence when they parse
pub const RUST_LOG_VAR: &str = "RUST_LOG";

const DEFAULT_DATA_DIR: &str = ".checklist";
const DEFAULT_LOG_FILTER: &str = "checklist=info,checklist_runtime=warn";

/// Errors for configuration values that cannot be used
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The data directory is set but blank
    #[error("CHECKLIST_DATA_DIR must not be empty")]
    EmptyDataDir,

    /// The slot key cannot name a slot
    #[error("CHECKLIST_SLOT_KEY is invalid: {0}")]
    InvalidSlotKey(#[source] StorageError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the slot files (default: `.checklist`)
    pub data_dir: PathBuf,
    /// Key of the todo list slot (default: `todos`)
    pub slot_key: String,
    /// `tracing` filter used when `RUST_LOG` is unset or unparseable
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from `lookup`, which maps variable names to values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(DATA_DIR_VAR) {
            Some(dir) if dir.trim().is_empty() => return Err(ConfigError::EmptyDataDir),
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(DEFAULT_DATA_DIR),
        };

        let slot_key = lookup(SLOT_KEY_VAR).unwrap_or_else(|| DEFAULT_SLOT_KEY.to_string());
        validate_key(&slot_key).map_err(ConfigError::InvalidSlotKey)?;

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            slot_key,
            log_filter,
        })
    }

    /// Pick the log filter directives to install
    ///
    /// `rust_log` wins when it parses, then the configured filter, then the
    /// built-in default.
    #[must_use]
    pub fn select_log_filter<'a>(&'a self, rust_log: Option<&'a str>) -> &'a str {
        [rust_log, Some(self.log_filter.as_str())]
            .into_iter()
            .flatten()
            .find(|directives| is_valid_filter(directives))
            .unwrap_or(DEFAULT_LOG_FILTER)
    }
}

fn is_valid_filter(directives: &str) -> bool {
    !directives.trim().is_empty() && EnvFilter::try_new(directives).is_ok()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/var/lib/checklist"),
            (SLOT_KEY_VAR, "work-todos"),
            (LOG_FILTER_VAR, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/checklist"));
        assert_eq!(config.slot_key, "work-todos");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn log_filter_ignores_rust_log() {
        let config = Config::from_lookup(lookup(&[(RUST_LOG_VAR, "checklist=loud")])).unwrap();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn valid_rust_log_takes_precedence() {
        let config = Config::from_lookup(lookup(&[(LOG_FILTER_VAR, "warn")])).unwrap();
        assert_eq!(config.select_log_filter(Some("debug")), "debug");
        assert_eq!(config.select_log_filter(None), "warn");
    }

    #[test]
    fn malformed_rust_log_falls_back() {
        let config = Config::from_lookup(lookup(&[(LOG_FILTER_VAR, "warn")])).unwrap();
        assert_eq!(config.select_log_filter(Some("checklist=loud")), "warn");

        let config = Config::default();
        assert_eq!(
            config.select_log_filter(Some("checklist=loud")),
            DEFAULT_LOG_FILTER
        );
    }

    #[test]
    fn malformed_configured_filter_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[(LOG_FILTER_VAR, "checklist=loud")])).unwrap();
        assert_eq!(config.select_log_filter(None), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(DATA_DIR_VAR, "  ")])),
            Err(ConfigError::EmptyDataDir)
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(SLOT_KEY_VAR, "../todos")])),
            Err(ConfigError::InvalidSlotKey(_))
        ));
    }
}

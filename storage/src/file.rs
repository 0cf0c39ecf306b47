//! One-file-per-key storage.

use checklist_core::storage::{KeyValueStore, Result, validate_key};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension of value files
const VALUE_EXTENSION: &str = "json";

/// Key-value store persisting each key as a file under a directory.
///
/// Keys are checked with [`validate_key`] before touching the filesystem, so
/// every path stays inside [`FileStore::dir`].
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. Nothing is created until the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the value files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`](checklist_core::storage::StorageError::InvalidKey)
    /// for keys that cannot be mapped onto a file name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.{VALUE_EXTENSION}.tmp"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => {
                tracing::trace!(path = %path.display(), bytes = value.len(), "Read slot");
                Ok(Some(value))
            },
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::trace!(path = %path.display(), "Slot file absent");
                Ok(None)
            },
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let temp = self.temp_path_for(key);
        fs::write(&temp, value)?;
        if let Err(error) = fs::rename(&temp, &path) {
            // Best effort: the temp file is useless without the rename
            let _ = fs::remove_file(&temp);
            return Err(error.into());
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "Wrote slot");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed slot");
                Ok(())
            },
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

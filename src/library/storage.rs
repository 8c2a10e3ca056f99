//! Durable key-value storage backing the library and the profile.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.alurio/
//! ├── .lock                  # Advisory write lock
//! ├── alurio_user.json       # Serialized profile
//! └── alurio_library.json    # Serialized library item sequence
//! ```

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::StorageError;

/// Key holding the serialized profile
pub const PROFILE_KEY: &str = "alurio_user";

/// Key holding the serialized library sequence
pub const LIBRARY_KEY: &str = "alurio_library";

/// Minimal durable key-value surface
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a value as a whole
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store in the configured state directory
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(crate::config::alurio_home()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(key, e))?;

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(self.dir.join(".lock"))
            .map_err(|e| StorageError::io(key, e))?;
        lock.lock_exclusive().map_err(|e| StorageError::io(key, e))?;

        // Write next to the target, then rename over it
        let result = NamedTempFile::new_in(&self.dir)
            .and_then(|mut tmp| {
                tmp.write_all(value.as_bytes())?;
                tmp.as_file().sync_all()?;
                tmp.persist(self.key_path(key)).map_err(|e| e.error)?;
                Ok(())
            })
            .map_err(|e| StorageError::io(key, e));

        if let Err(e) = lock.unlock() {
            warn!(key, error = %e, "Failed to release storage lock");
        }
        result
    }
}

/// In-process store for tests and embedders that persist elsewhere
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

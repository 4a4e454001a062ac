//! Key-value persistence.
//!
//! Every persisted value is a JSON document stored under a string key, the
//! same shape a browser's local storage offers. [`JsonDirStore`] keeps one
//! `<key>.json` file per key; [`MemoryStore`] backs tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Keys used by the application.
pub mod keys {
    pub const MESSAGES: &str = "messages";
    pub const CHANNELS: &str = "channels";
    pub const LAST_ADDED_MESSAGE_ID: &str = "lastAddedMessageId";
    pub const ARCHIVE_FILTER: &str = "archiveFilter";
    pub const TASK_FILTER: &str = "taskFilter";
    pub const SELECTED_TAG: &str = "selectedTag";
    pub const ACTIVE_THREAD_ID: &str = "activeThreadId";
    pub const ACTIVE_CHANNEL_ID: &str = "activeChannelId";
    pub const SEARCH_TERM: &str = "searchTerm";
    pub const IS_SEARCH_ACTIVE: &str = "isSearchActive";
    pub const SEARCH_OPTIONS: &str = "searchOptions";
    pub const IS_SIDEBAR_VISIBLE: &str = "isSidebarVisible";
}

/// Failure reading or writing a persisted value.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed value for key `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value store.
pub trait KeyValueStore: Send {
    /// Returns the raw stored text, or `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores raw text under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Reads and decodes a JSON value.
///
/// # Errors
///
/// Returns [`StorageError::Malformed`] if the stored text is not valid for `T`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

/// Encodes and writes a JSON value.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Reads a value, substituting `default` when it is missing or unreadable.
///
/// Unreadable values are logged and never surfaced to the caller.
pub fn load_or_default<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load persisted value, using default");
            default
        }
    }
}

/// Writes a value, logging instead of failing.
///
/// In-memory state stays authoritative for the session when a write fails.
pub fn persist<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = write_json(store, key, value) {
        tracing::warn!(key, error = %e, "failed to persist value");
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Returns the file that holds `key`.
    #[must_use]
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonDirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write then rename so a crash never leaves a half-written document.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, self.key_path(key)).map_err(io_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-memory store. Clones share the same map so tests can inspect writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw text stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Seeds raw text, bypassing encoding (for malformed-data tests).
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

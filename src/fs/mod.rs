//! File system operations and persistence.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub mod storage;
pub mod ui_state;

pub use storage::{
    JsonDirStore, KeyValueStore, MemoryStore, StorageError, keys, load_or_default, persist,
    read_json, write_json,
};
pub use ui_state::{PersistedSearch, PersistedSelectors};

/// Default data directory, relative to the working directory.
pub const DATA_DIR: &str = ".io-notes";

/// Holds all paths derived from the data directory.
///
/// Injected so that tests can point the application at a temporary
/// directory instead of the working directory.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use io_notes::fs::DataPaths;
///
/// let paths = DataPaths::new(Path::new("/tmp/notes"));
/// assert_eq!(paths.log_file(), Path::new("/tmp/notes/io-notes.log"));
/// ```
#[derive(Debug, Clone)]
pub struct DataPaths {
    base: PathBuf,
}

impl DataPaths {
    /// Creates paths rooted at the given data directory.
    #[must_use]
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    /// Creates paths rooted at `./.io-notes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn from_cwd() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new(&cwd.join(DATA_DIR)))
    }

    /// Returns the data directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the directory holding one JSON document per storage key.
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.base.join("store")
    }

    /// Returns the default log file path.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.base.join("io-notes.log")
    }

    /// Ensures the data directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.store_dir()).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.store_dir().display()
            )
        })
    }

    /// Opens the file-backed key-value store.
    #[must_use]
    pub fn open_store(&self) -> JsonDirStore {
        JsonDirStore::new(&self.store_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn paths_are_derived_from_base() {
        let paths = DataPaths::new(Path::new("/data/notes"));

        assert_eq!(paths.base(), Path::new("/data/notes"));
        assert_eq!(paths.store_dir(), Path::new("/data/notes/store"));
        assert_eq!(paths.log_file(), Path::new("/data/notes/io-notes.log"));
    }

    #[test]
    fn ensure_dirs_creates_store_directory() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = DataPaths::new(&temp.path().join("nested"));

        assert!(!paths.store_dir().exists());
        paths.ensure_dirs()?;
        assert!(paths.store_dir().exists());
        Ok(())
    }

    #[test]
    fn open_store_writes_under_store_dir() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = DataPaths::new(temp.path());
        let mut store = paths.open_store();

        store.set(keys::SEARCH_TERM, "\"rust\"")?;
        assert!(paths.store_dir().join("searchTerm.json").exists());
        Ok(())
    }
}

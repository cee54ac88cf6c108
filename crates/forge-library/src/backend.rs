//! Filesystem key-value backend.

use forge_core::traits::KeyValueStore;
use forge_core::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file first and are renamed into
/// place, so readers never observe a half-written value.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// └── skill-forge.library.json
/// ```
///
/// # Examples
///
/// ```
/// use forge_core::traits::KeyValueStore;
/// use forge_library::FileStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let mut store = FileStore::new(dir.path())?;
///
/// store.set("library", "[]")?;
/// assert_eq!(store.get("library")?.as_deref(), Some("[]"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| Error::Storage {
                key: dir.display().to_string(),
                message: format!("cannot create data directory: {e}"),
            })?;
            tracing::debug!("Created data directory: {}", dir.display());
        }
        Ok(Self { dir })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a key is stored in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for keys that are empty or
    /// contain anything other than ASCII letters, digits, `-`, `_` and `.`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("invalid storage key '{key}'")))
    }
}

fn storage_error(key: &str, action: &str, e: &std::io::Error) -> Error {
    Error::Storage {
        key: key.to_string(),
        message: format!("{action}: {e}"),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(key, "read failed", &e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&temp, value).map_err(|e| storage_error(key, "write failed", &e))?;
        if let Err(e) = fs::rename(&temp, &path) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                tracing::warn!("Failed to remove temporary file {}: {}", temp.display(), cleanup);
            }
            return Err(storage_error(key, "replace failed", &e));
        }

        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(key, "remove failed", &e)),
        }
    }
}

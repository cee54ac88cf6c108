//! Key-value storage trait.
//!
//! The library is persisted as one opaque blob under one well-known key,
//! so the backend only needs whole-value get/set/remove.

use crate::Result;
use std::collections::HashMap;

/// Whole-value key-value storage.
///
/// All implementations must be `Send + Sync` so a store can be moved
/// into async tasks.
///
/// # Examples
///
/// ```
/// use forge_core::traits::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("library", "[]").unwrap();
/// assert_eq!(store.get("library").unwrap().as_deref(), Some("[]"));
///
/// store.remove("library").unwrap();
/// assert!(store.get("library").unwrap().is_none());
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`](crate::Error::Storage) if the backend
    /// exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`](crate::Error::Storage) if the write fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes the value stored under `key`; missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`](crate::Error::Storage) if the delete fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, used by tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

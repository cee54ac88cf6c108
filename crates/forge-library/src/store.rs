//! The skill library.
//!
//! The whole collection lives in memory and is written back to a
//! [`KeyValueStore`] as one JSON array after every change.

use crate::record::{SkillMetadata, SkillRecord};
use chrono::{SubsecRound, Utc};
use forge_core::traits::KeyValueStore;
use forge_core::{Error, Result, SkillId};
use forge_files::FileSet;
use forge_parser::instruction::description_or_default;

/// Key under which the library is stored.
pub const LIBRARY_STORAGE_KEY: &str = "skill-forge.library";

/// Saved skills, most recent first.
///
/// The library is the single owner of its collection and backend. When
/// several processes share a backend, the last writer wins.
///
/// # Examples
///
/// ```
/// use forge_core::traits::MemoryStore;
/// use forge_files::{FileRecord, FileSet};
/// use forge_library::LibraryStore;
///
/// let mut library = LibraryStore::open(MemoryStore::new());
///
/// let mut draft = FileSet::new();
/// draft.replace_all(
///     vec![FileRecord::new("SKILL.md", "name: kit\ndescription: Checks ratios")],
///     "kit",
/// );
///
/// let saved = library.promote(&draft).unwrap();
/// assert_eq!(saved.description, "Checks ratios");
/// assert_eq!(library.list()[0].id, saved.id);
/// ```
#[derive(Debug)]
pub struct LibraryStore<S: KeyValueStore> {
    backend: S,
    key: String,
    records: Vec<SkillRecord>,
}

impl<S: KeyValueStore> LibraryStore<S> {
    /// Loads the library from `backend`.
    ///
    /// Missing, unreadable or corrupt data yields an empty library.
    #[must_use]
    pub fn open(backend: S) -> Self {
        Self::open_with_key(backend, LIBRARY_STORAGE_KEY)
    }

    /// Loads the library from `backend` under a custom key.
    #[must_use]
    pub fn open_with_key(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = match backend.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<SkillRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "stored library is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "stored library is unreadable, starting empty");
                Vec::new()
            }
        };

        tracing::debug!("Opened library '{}' with {} record(s)", key, records.len());

        Self {
            backend,
            key,
            records,
        }
    }

    /// Saves a snapshot of `draft` as a new record at the front of the
    /// library.
    ///
    /// The description comes from the first instruction file's
    /// `description:` line. Triggers and capabilities stay empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBundle`] if the draft has no files, and
    /// [`Error::Storage`] or [`Error::SerializationError`] if the library
    /// cannot be written back. On error the library is unchanged.
    pub fn promote(&mut self, draft: &FileSet) -> Result<SkillRecord> {
        if draft.is_empty() {
            return Err(Error::EmptyBundle {
                operation: "save".to_string(),
            });
        }

        let instructions = draft
            .instruction_file()
            .map(|f| f.content().to_string())
            .unwrap_or_default();

        let record = SkillRecord {
            id: SkillId::generate(),
            name: draft.draft_name().to_string(),
            description: description_or_default(&instructions).to_string(),
            metadata: SkillMetadata::default(),
            instructions,
            files: draft.snapshot(),
            updated_at: Utc::now().trunc_subsecs(3),
        };

        self.records.insert(0, record.clone());
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }

        tracing::info!(
            id = %record.id,
            name = %record.name,
            files = record.file_count(),
            "skill saved to library"
        );

        Ok(record)
    }

    /// All records, most recent first.
    #[must_use]
    pub fn list(&self) -> &[SkillRecord] {
        &self.records
    }

    /// Looks up a record by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SkillRecord> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }

    /// Looks up a record by exact id or unique id prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if nothing matches or the prefix
    /// is ambiguous.
    pub fn lookup(&self, id_or_prefix: &str) -> Result<&SkillRecord> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return Err(Error::InvalidArgument("skill id cannot be empty".to_string()));
        }
        if let Some(record) = self.get(needle) {
            return Ok(record);
        }

        let mut matches = self
            .records
            .iter()
            .filter(|r| r.id.as_str().starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
                "skill id prefix '{needle}' is ambiguous"
            ))),
            (None, _) => Err(Error::InvalidArgument(format!("no saved skill with id '{needle}'"))),
        }
    }

    /// Number of saved records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deletes every record and the stored data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the stored data cannot be removed; the
    /// in-memory collection is left intact in that case.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(&self.key)?;
        let removed = self.records.len();
        self.records.clear();
        tracing::info!(removed, "library cleared");
        Ok(())
    }

    /// The storage backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.records)?;
        self.backend.set(&self.key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::traits::MemoryStore;
    use forge_files::FileRecord;

    /// Backend whose writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnly(MemoryStore);

    impl KeyValueStore for ReadOnly {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage {
                key: key.to_string(),
                message: "read-only".to_string(),
            })
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.set(key, "")
        }
    }

    fn draft(name: &str, files: &[(&str, &str)]) -> FileSet {
        let mut set = FileSet::new();
        set.replace_all(
            files.iter().map(|(p, c)| FileRecord::new(*p, *c)).collect(),
            name,
        );
        set
    }

    #[test]
    fn test_open_empty_backend() {
        let library = LibraryStore::open(MemoryStore::new());
        assert!(library.is_empty());
    }

    #[test]
    fn test_open_corrupt_data() {
        let mut backend = MemoryStore::new();
        backend.set(LIBRARY_STORAGE_KEY, "{not json").unwrap();
        assert!(LibraryStore::open(backend).is_empty());

        let mut backend = MemoryStore::new();
        backend.set(LIBRARY_STORAGE_KEY, r#"{"id":"an object"}"#).unwrap();
        assert!(LibraryStore::open(backend).is_empty());
    }

    #[test]
    fn test_promote_empty_draft() {
        let mut library = LibraryStore::open(MemoryStore::new());
        let err = library.promote(&FileSet::new()).unwrap_err();
        assert!(err.is_empty_bundle());
        assert!(library.is_empty());
        assert!(library.backend().get(LIBRARY_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_promote_defaults() {
        let mut library = LibraryStore::open(MemoryStore::new());
        let record = library.promote(&draft("plain", &[("notes.md", "hi")])).unwrap();
        assert_eq!(record.description, "Expert Agent Module");
        assert!(record.instructions.is_empty());
        assert_eq!(record.metadata.version, "1.0.0");
        assert!(record.metadata.triggers.is_empty());
        assert!(record.metadata.capabilities.is_empty());
        assert_eq!(record.id.as_str().len(), 32);
    }

    #[test]
    fn test_promote_uses_first_instruction_file() {
        let mut library = LibraryStore::open(MemoryStore::new());
        let record = library
            .promote(&draft(
                "kit",
                &[
                    ("a/SKILL.md", "description: first"),
                    ("b/SKILL.md", "description: second"),
                ],
            ))
            .unwrap();
        assert_eq!(record.description, "first");
        assert_eq!(record.instructions, "description: first");
    }

    #[test]
    fn test_most_recent_first_and_unique_ids() {
        let mut library = LibraryStore::open(MemoryStore::new());
        let set = draft("kit", &[("SKILL.md", "x")]);
        let first = library.promote(&set).unwrap();
        let second = library.promote(&set).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(library.list()[0].id, second.id);
        assert_eq!(library.list()[1].id, first.id);
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let mut library = LibraryStore::open(ReadOnly::default());
        let err = library.promote(&draft("kit", &[("SKILL.md", "x")])).unwrap_err();
        assert!(err.is_storage_error());
        assert!(library.is_empty());
    }

    #[test]
    fn test_lookup_by_prefix() {
        let mut library = LibraryStore::open(MemoryStore::new());
        let record = library.promote(&draft("kit", &[("SKILL.md", "x")])).unwrap();
        let prefix = &record.id.as_str()[..8];
        assert_eq!(library.lookup(prefix).unwrap().id, record.id);
        assert!(library.lookup("zzzz-not-an-id").is_err());
        assert!(library.lookup(" ").is_err());
    }

    #[test]
    fn test_clear() {
        let mut library = LibraryStore::open(MemoryStore::new());
        library.promote(&draft("kit", &[("SKILL.md", "x")])).unwrap();
        library.clear().unwrap();
        assert!(library.is_empty());
        assert!(library.backend().get(LIBRARY_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_reopen_sees_saved_records() {
        let mut library = LibraryStore::open(MemoryStore::new());
        library.promote(&draft("kit", &[("SKILL.md", "x")])).unwrap();
        let backend = library.backend().clone();

        let reopened = LibraryStore::open(backend);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.list()[0].name, "kit");
    }

    #[test]
    fn test_reopened_record_equals_saved() {
        let mut library = LibraryStore::open(MemoryStore::new());
        let saved = library.promote(&draft("kit", &[("SKILL.md", "x")])).unwrap();
        assert_eq!(saved.updated_at.timestamp_subsec_nanos() % 1_000_000, 0);

        let reopened = LibraryStore::open(library.backend().clone());
        assert_eq!(reopened.list()[0], saved);
        assert_eq!(library.list()[0], saved);
    }
}

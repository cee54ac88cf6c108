//! Library of saved skill packages.
//!
//! Promoting a draft takes an independent snapshot of its files, gives it
//! a fresh id and puts it at the front of the library. The collection is
//! persisted as a whole through a [`KeyValueStore`](forge_core::traits::KeyValueStore);
//! stored data that cannot be read back is treated as an empty library.
//!
//! Backends:
//!
//! - [`MemoryStore`](forge_core::traits::MemoryStore) - in-process only
//! - [`FileStore`] - one JSON file per key in a data directory
//!
//! # Examples
//!
//! ```
//! use forge_files::{FileRecord, FileSet};
//! use forge_library::{FileStore, LibraryStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//!
//! let mut draft = FileSet::new();
//! draft.replace_all(vec![FileRecord::new("SKILL.md", "name: kit")], "kit");
//!
//! let mut library = LibraryStore::open(FileStore::new(dir.path())?);
//! let saved = library.promote(&draft)?;
//!
//! // A new session sees the same record.
//! let reopened = LibraryStore::open(FileStore::new(dir.path())?);
//! assert_eq!(reopened.list()[0].id, saved.id);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod backend;
mod record;
mod store;

pub use backend::FileStore;
pub use record::{INITIAL_VERSION, SkillMetadata, SkillRecord};
pub use store::{LIBRARY_STORAGE_KEY, LibraryStore};

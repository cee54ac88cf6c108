//! Integration tests for the library on the filesystem backend.

use forge_core::traits::KeyValueStore;
use forge_files::{FileRecord, FileSet};
use forge_library::{FileStore, LIBRARY_STORAGE_KEY, LibraryStore};
use forge_parser::parse;
use std::fs;
use tempfile::TempDir;

fn parsed_draft() -> FileSet {
    let reply = "[FILE: brand-compliance/SKILL.md]\n\
        ---\nname: brand-compliance\ndescription: Audits assets against the brand book\n---\n\
        [FILE: brand-compliance/palette.json]\n```json\n{\"primary\": \"#0A84FF\"}\n```";
    let bundle = parse(reply, "untitled-project").unwrap();
    let mut draft = FileSet::new();
    draft.replace_all(bundle.files, bundle.resolved_name);
    draft
}

/// Saved records survive a restart.
#[test]
fn test_persistence_round_trip() {
    let temp = TempDir::new().unwrap();

    let saved = {
        let mut library = LibraryStore::open(FileStore::new(temp.path()).unwrap());
        library.promote(&parsed_draft()).unwrap()
    };

    let library = LibraryStore::open(FileStore::new(temp.path()).unwrap());
    assert_eq!(library.len(), 1);
    let record = library.get(saved.id.as_str()).unwrap();
    assert_eq!(record, &saved);
    assert_eq!(record.name, "brand-compliance");
    assert_eq!(record.description, "Audits assets against the brand book");
    assert_eq!(record.files[1].content(), "{\"primary\": \"#0A84FF\"}");
}

/// The record keeps its files after the draft moves on.
#[test]
fn test_snapshot_semantics() {
    let temp = TempDir::new().unwrap();
    let mut library = LibraryStore::open(FileStore::new(temp.path()).unwrap());

    let mut draft = parsed_draft();
    let saved = library.promote(&draft).unwrap();

    draft.replace_all(vec![FileRecord::new("other.md", "changed")], "other");

    let record = library.get(saved.id.as_str()).unwrap();
    assert_eq!(record.files.len(), 2);
    assert_eq!(record.files[0].path(), "brand-compliance/SKILL.md");
}

/// A damaged library file is treated as an empty library and replaced on
/// the next save.
#[test]
fn test_corrupt_file_recovers() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path()).unwrap();
    let path = store.path_for(LIBRARY_STORAGE_KEY).unwrap();
    fs::write(&path, "[{\"id\": \"trunc").unwrap();

    let mut library = LibraryStore::open(store);
    assert!(library.is_empty());

    library.promote(&parsed_draft()).unwrap();
    let raw = library.backend().get(LIBRARY_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

/// Opening a saved record yields a draft equal to the one saved.
#[test]
fn test_open_saved_record_as_draft() {
    let temp = TempDir::new().unwrap();
    let mut library = LibraryStore::open(FileStore::new(temp.path()).unwrap());
    let draft = parsed_draft();
    let saved = library.promote(&draft).unwrap();

    let reopened = saved.to_draft();
    assert_eq!(reopened.files(), draft.files());
    assert_eq!(reopened.draft_name(), draft.draft_name());
}

/// Clearing removes the stored file.
#[test]
fn test_clear_removes_file() {
    let temp = TempDir::new().unwrap();
    let mut library = LibraryStore::open(FileStore::new(temp.path()).unwrap());
    library.promote(&parsed_draft()).unwrap();
    let path = library.backend().path_for(LIBRARY_STORAGE_KEY).unwrap();
    assert!(path.exists());

    library.clear().unwrap();
    assert!(!path.exists());
    assert!(LibraryStore::open(FileStore::new(temp.path()).unwrap()).is_empty());
}

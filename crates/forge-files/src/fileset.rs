//! The draft file set.
//!
//! A `FileSet` is replaced wholesale whenever a new batch of files is
//! produced; individual files are never patched in place. It also tracks
//! which file is selected for preview.

use crate::types::{FileRecord, FilesError, Result};
use forge_core::DEFAULT_FALLBACK_NAME;
use std::collections::HashMap;

/// Ordered collection of draft files plus the draft package name.
///
/// Paths are not guaranteed unique: an assistant reply may emit the same
/// path twice, and both records are kept in emission order. Consumers that
/// need one record per path use [`resolved_files`](Self::resolved_files).
///
/// # Examples
///
/// ```
/// use forge_files::{FileRecord, FileSet};
///
/// let mut draft = FileSet::new();
/// draft.replace_all(vec![FileRecord::new("SKILL.md", "a")], "demo");
///
/// assert_eq!(draft.draft_name(), "demo");
/// assert_eq!(draft.selected_index(), Some(0));
/// assert!(draft.select(3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<FileRecord>,
    draft_name: String,
    selected: usize,
}

impl FileSet {
    /// Creates an empty draft named with the default fallback name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_name(DEFAULT_FALLBACK_NAME)
    }

    /// Creates an empty draft with the given name.
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            draft_name: name.into(),
            selected: 0,
        }
    }

    /// Replaces every file and the draft name, resetting the selection to
    /// the first file.
    pub fn replace_all(&mut self, files: Vec<FileRecord>, name: impl Into<String>) {
        self.files = files;
        self.draft_name = name.into();
        self.selected = 0;
        tracing::debug!(
            files = self.files.len(),
            name = %self.draft_name,
            "draft replaced"
        );
    }

    /// Removes every file, keeping the draft name.
    pub fn clear(&mut self) {
        self.files.clear();
        self.selected = 0;
    }

    /// Returns `true` if the draft holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of records, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// All records in emission order.
    #[must_use]
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Iterates over records in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.files.iter()
    }

    /// The draft package name.
    #[must_use]
    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    /// Renames the draft without touching its files.
    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
    }

    /// Index of the selected file, or `None` when the draft is empty.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        (self.selected < self.files.len()).then_some(self.selected)
    }

    /// The selected file, or `None` when the draft is empty.
    #[must_use]
    pub fn selected(&self) -> Option<&FileRecord> {
        self.files.get(self.selected)
    }

    /// Selects the file at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::SelectionOutOfRange`] if `index` is not a
    /// valid position; the current selection is left unchanged.
    pub fn select(&mut self, index: usize) -> Result<&FileRecord> {
        let len = self.files.len();
        match self.files.get(index) {
            Some(file) => {
                self.selected = index;
                Ok(file)
            }
            None => Err(FilesError::SelectionOutOfRange { index, len }),
        }
    }

    /// Selects the last file stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::FileNotFound`] if no file has that path.
    pub fn select_path(&mut self, path: &str) -> Result<&FileRecord> {
        let index = self
            .files
            .iter()
            .rposition(|f| f.path() == path)
            .ok_or_else(|| FilesError::FileNotFound {
                path: path.to_string(),
            })?;
        self.select(index)
    }

    /// Looks up a file by exact path. When the path repeats, the last
    /// record wins.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.iter().rev().find(|f| f.path() == path)
    }

    /// Returns `true` if some record has exactly this path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path() == path)
    }

    /// The first instruction file in emission order.
    #[must_use]
    pub fn instruction_file(&self) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.is_instruction())
    }

    /// One record per path: each path keeps its first position and its
    /// last content.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_files::{FileRecord, FileSet};
    ///
    /// let mut draft = FileSet::new();
    /// draft.replace_all(
    ///     vec![
    ///         FileRecord::new("a.md", "old"),
    ///         FileRecord::new("b.md", "b"),
    ///         FileRecord::new("a.md", "new"),
    ///     ],
    ///     "x",
    /// );
    ///
    /// let resolved = draft.resolved_files();
    /// assert_eq!(resolved.len(), 2);
    /// assert_eq!(resolved[0].content(), "new");
    /// assert_eq!(resolved[1].path(), "b.md");
    /// ```
    #[must_use]
    pub fn resolved_files(&self) -> Vec<&FileRecord> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut resolved: Vec<&FileRecord> = Vec::with_capacity(self.files.len());
        for file in &self.files {
            if let Some(&slot) = slots.get(file.path()) {
                resolved[slot] = file;
            } else {
                slots.insert(file.path(), resolved.len());
                resolved.push(file);
            }
        }
        resolved
    }

    /// Paths that occur more than once, each listed once in order of
    /// first appearance.
    #[must_use]
    pub fn duplicate_paths(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for file in &self.files {
            *counts.entry(file.path()).or_default() += 1;
        }
        let mut seen = Vec::new();
        for file in &self.files {
            let path = file.path();
            if counts.get(path).is_some_and(|&n| n > 1) && !seen.contains(&path) {
                seen.push(path);
            }
        }
        seen
    }

    /// Independent copy of every record, for storing outside the draft.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FileRecord> {
        self.files.clone()
    }

    /// Total content size in bytes.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.files.iter().map(FileRecord::size).sum()
    }
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

//! Core types for draft files.
//!
//! # Examples
//!
//! ```
//! use forge_files::{FileRecord, Language};
//!
//! let file = FileRecord::new("scripts/dcf_model.py", "def npv(): ...");
//!
//! assert_eq!(file.name(), "dcf_model.py");
//! assert_eq!(file.path(), "scripts/dcf_model.py");
//! assert_eq!(file.language(), Language::Python);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Case-insensitive path fragment that marks a package's instruction file.
pub const INSTRUCTION_FILE_MARKER: &str = "skill.md";

/// Returns `true` if `path` names an instruction file.
///
/// The match is a case-insensitive substring test, so `SKILL.md`,
/// `docs/Skill.md` and `skill.md.bak` all qualify.
///
/// # Examples
///
/// ```
/// use forge_files::is_instruction_path;
///
/// assert!(is_instruction_path("my-skill/SKILL.md"));
/// assert!(!is_instruction_path("README.md"));
/// ```
#[must_use]
pub fn is_instruction_path(path: &str) -> bool {
    path.to_lowercase().contains(INSTRUCTION_FILE_MARKER)
}

/// Errors raised by draft file set operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilesError {
    /// Selection index is past the end of the draft.
    #[error("cannot select file {index}: draft has {len} file(s)")]
    SelectionOutOfRange {
        /// Requested index
        index: usize,
        /// Number of files in the draft
        len: usize,
    },

    /// No file exists at the given path.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was looked up
        path: String,
    },
}

impl FilesError {
    /// Returns `true` if this is a file not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

/// Coarse content-type tag derived from a path's extension.
///
/// Display metadata only; it never decides whether text is a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// `.py` scripts
    Python,
    /// `.json` structured data
    Json,
    /// Everything else: instructions, references, templates
    #[default]
    Markdown,
}

impl Language {
    /// Infers the tag from a path's extension. The match is exact, so
    /// `run.PY` is not tagged as Python.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_files::Language;
    ///
    /// assert_eq!(Language::from_path("run.py"), Language::Python);
    /// assert_eq!(Language::from_path("run.PY"), Language::Markdown);
    /// assert_eq!(Language::from_path("schema.json"), Language::Json);
    /// assert_eq!(Language::from_path("SKILL.md"), Language::Markdown);
    /// assert_eq!(Language::from_path("Makefile"), Language::Markdown);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".py") {
            Self::Python
        } else if path.ends_with(".json") {
            Self::Json
        } else {
            Self::Markdown
        }
    }

    /// Returns the tag as a lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file of a skill package.
///
/// `name` and `language` are derived from `path` on construction and on
/// deserialization; stored values for them are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredFileRecord")]
pub struct FileRecord {
    name: String,
    path: String,
    content: String,
    language: Language,
}

/// Shape accepted when reading persisted records.
#[derive(Deserialize)]
struct StoredFileRecord {
    path: String,
    #[serde(default)]
    content: String,
}

impl From<StoredFileRecord> for FileRecord {
    fn from(stored: StoredFileRecord) -> Self {
        Self::new(stored.path, stored.content)
    }
}

impl FileRecord {
    /// Creates a record, deriving its name and language from `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_files::FileRecord;
    ///
    /// assert_eq!(FileRecord::new("a/b/c.json", "{}").name(), "c.json");
    ///
    /// // No final segment: the name falls back to the whole path.
    /// assert_eq!(FileRecord::new("assets/", "").name(), "assets/");
    /// assert_eq!(FileRecord::new("", "").name(), "");
    /// ```
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = match path.rsplit('/').next() {
            Some(segment) if !segment.is_empty() => segment.to_string(),
            _ => path.clone(),
        };
        let language = Language::from_path(&path);
        Self {
            name,
            path,
            content: content.into(),
            language,
        }
    }

    /// Final path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full relative path within the package.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content-type tag.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Size of the content in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if this record is the package's instruction file.
    #[must_use]
    pub fn is_instruction(&self) -> bool {
        is_instruction_path(&self.path)
    }
}

/// Type alias for draft file set results.
pub type Result<T> = std::result::Result<T, FilesError>;

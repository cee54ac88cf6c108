//! In-memory draft file set for skill packages.
//!
//! Holds the files of the package currently being edited, in the order
//! the assistant produced them, together with the draft package name and
//! the file selected for preview.
//!
//! # Examples
//!
//! ```
//! use forge_files::{FileRecord, FileSet, Language};
//!
//! let mut draft = FileSet::new();
//! assert!(draft.is_empty());
//!
//! draft.replace_all(
//!     vec![
//!         FileRecord::new("SKILL.md", "name: ratios"),
//!         FileRecord::new("scripts/calc.py", "print(1)"),
//!     ],
//!     "ratios",
//! );
//!
//! assert_eq!(draft.len(), 2);
//! assert_eq!(draft.files()[1].name(), "calc.py");
//! assert_eq!(draft.files()[1].language(), Language::Python);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod fileset;
pub mod types;

pub use fileset::FileSet;
pub use types::{FileRecord, FilesError, INSTRUCTION_FILE_MARKER, Language, Result, is_instruction_path};

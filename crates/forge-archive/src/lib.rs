//! Packaging skill drafts for download.
//!
//! Three formats are supported:
//!
//! - [`ArchiveFormat::Zip`] - deflate-compressed zip
//! - [`ArchiveFormat::TarGz`] - gzip-compressed tarball
//! - [`ArchiveFormat::Manifest`] - every file concatenated as plain text
//!
//! Archives are built entirely in memory by [`ArchiveBuilder`] and only
//! then handed to a [`DownloadSink`].
//!
//! # Examples
//!
//! ```
//! use forge_archive::{ArchiveBuilder, ArchiveFormat};
//! use forge_files::{FileRecord, FileSet};
//!
//! let mut draft = FileSet::new();
//! draft.replace_all(
//!     vec![
//!         FileRecord::new("SKILL.md", "name: ratio-kit"),
//!         FileRecord::new("scripts/ratios.py", "print(1)"),
//!     ],
//!     "ratio-kit",
//! );
//!
//! let archive = ArchiveBuilder::new(ArchiveFormat::Zip)
//!     .with_name(draft.draft_name())
//!     .build(&draft)
//!     .unwrap();
//!
//! assert_eq!(archive.file_name, "ratio-kit.zip");
//! assert_eq!(archive.content_type, "application/zip");
//! assert!(archive.bytes.starts_with(b"PK"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod builder;
mod format;
mod sink;

pub use builder::{Archive, ArchiveBuilder};
pub use format::ArchiveFormat;
pub use sink::{DirectorySink, DownloadSink, MemorySink, export};

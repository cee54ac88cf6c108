//! Parser for file blocks in assistant replies.
//!
//! Assistant replies describe a skill package as a sequence of blocks:
//!
//! ```text
//! [FILE: <path>]
//! <optional fenced-code opening line>
//! <content>
//! <optional fenced-code closing line>
//! [FILE: <next path>]
//! ...
//! ```
//!
//! [`parse`] turns such text into [`FileRecord`](forge_files::FileRecord)s
//! and resolves the package name from the instruction file. Text outside
//! blocks is ignored, and text without any block parses to `None`.
//!
//! # Examples
//!
//! ```
//! use forge_parser::parse;
//!
//! let bundle = parse(
//!     "[FILE: SKILL.md]\nname: brand-check\n[FILE: palette.json]\n{}",
//!     "untitled-project",
//! )
//! .unwrap();
//!
//! assert_eq!(bundle.resolved_name, "brand-check");
//! assert_eq!(bundle.files[1].name(), "palette.json");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod diff;
pub mod instruction;
pub mod parser;
pub mod scanner;

pub use diff::{BundleDiff, diff_bundles};
pub use instruction::{DEFAULT_DESCRIPTION, extract_description, extract_name};
pub use parser::{ParsedBundle, parse, parse_strict, strip_fences};
pub use scanner::{FILE_MARKER, MalformedMarker, RawBlock, Scan, contains_file_marker, scan};

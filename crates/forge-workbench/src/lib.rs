//! Editing session for skill packages.
//!
//! A [`Workbench`] ties the pieces together: it sends prompts to a
//! [`CompletionProvider`](forge_core::traits::CompletionProvider), turns
//! `[FILE: path]` blocks in the reply into the draft, exports the draft as
//! an archive and promotes it into the saved library.
//!
//! [`CommandProvider`] is the bundled provider. It pipes the conversation
//! through any external command, so no particular model vendor is assumed.
//!
//! # Examples
//!
//! ```
//! use forge_archive::MemorySink;
//! use forge_core::ForgeConfig;
//! use forge_core::traits::MemoryStore;
//! use forge_library::LibraryStore;
//! use forge_workbench::{View, Workbench, cookbook};
//!
//! let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
//! let pattern = cookbook::find_pattern("advanced-dcf-valuation").unwrap();
//! bench.scaffold(pattern).unwrap();
//!
//! let mut sink = MemorySink::new();
//! let archive = bench.export(&mut sink).unwrap();
//! assert_eq!(archive.file_name, "advanced-dcf-valuation.zip");
//!
//! let mut library = LibraryStore::open(MemoryStore::new());
//! let record = bench.save_to(&mut library).unwrap();
//! assert_eq!(record.name, "advanced-dcf-valuation");
//! assert_eq!(bench.view(), View::Directory);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod buffer;
pub mod cookbook;
pub mod prompt;
mod provider;
mod session;

pub use buffer::{Preview, ResponseBuffer};
pub use cookbook::{CookbookPattern, PATTERNS, find_pattern};
pub use prompt::{CONNECTION_ERROR_MESSAGE, DEFAULT_SYSTEM_INSTRUCTION, GREETING};
pub use provider::CommandProvider;
pub use session::{ApplyOutcome, Reply, View, Workbench};

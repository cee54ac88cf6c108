//! Skill Forge CLI library.
//!
//! Exposes the command implementations and output formatters so they can
//! be tested and embedded without spawning the binary.

#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

pub mod actions;
pub mod commands;
pub mod formatters;

pub use actions::{ConfigAction, CookbookAction, ExportArgs, LibraryAction};
pub use commands::common::{Context, exit_code_for};

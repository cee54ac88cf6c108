//! Command implementations for the skill-forge CLI.
//!
//! Each command module reads its input, drives a workbench session or the
//! library, and prints its result in the requested output format.

pub mod common;
pub mod completions;
pub mod config;
pub mod cookbook;
pub mod export;
pub mod generate;
pub mod library;
pub mod parse;
pub mod save;

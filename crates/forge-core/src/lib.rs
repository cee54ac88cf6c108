//! Core types, traits, and errors for skill-forge.
//!
//! This crate provides the foundational types and abstractions used across
//! all other crates in the skill-forge workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`SkillId`, `ChatMessage`)
//! - The error taxonomy shared by parsing, bundling and persistence
//! - Collaborator traits for model completion and key-value storage
//! - Configuration types loaded from TOML

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;
pub mod traits;

pub use config::{
    DEFAULT_FALLBACK_NAME, DEFAULT_PACKAGE_NAME, ExportConfig, ForgeConfig, GeneralConfig,
    ParserConfig, ProviderConfig,
};
pub use error::{Error, Result};
pub use types::{ChatMessage, Role, SkillId};

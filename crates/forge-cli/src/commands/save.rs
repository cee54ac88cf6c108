//! Save command implementation.
//!
//! Parses assistant output and promotes the files into the saved library.

use super::common::{Context, read_input};
use crate::formatters::print_output;
use anyhow::Result;
use forge_core::cli::ExitCode;
use forge_library::SkillRecord;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Result of saving a skill.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SaveResult {
    /// New skill id
    pub id: String,
    /// Skill name
    pub name: String,
    /// Skill description
    pub description: String,
    /// Number of files stored
    pub file_count: usize,
    /// Library directory
    pub library: String,
}

impl SaveResult {
    /// Describes a stored record.
    #[must_use]
    pub fn new(record: &SkillRecord, library: &Path) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            file_count: record.file_count(),
            library: library.display().to_string(),
        }
    }
}

/// Runs the save command.
///
/// # Errors
///
/// Returns an error if the input holds no file blocks or the library
/// cannot be written.
pub fn run(ctx: &Context, input: &Path) -> Result<ExitCode> {
    let text = read_input(input)?;
    let mut bench = ctx.workbench()?;
    bench.apply_generated(&text)?;

    let mut library = ctx.library()?;
    let record = bench.save_to(&mut library)?;

    let result = SaveResult::new(&record, library.backend().dir());
    info!("Saved '{}' as {}", result.name, result.id);
    print_output(&result, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

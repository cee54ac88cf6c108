//! Library command implementation.
//!
//! Lists, shows, exports and clears saved skills.

use super::common::{Context, ExportResult, export_draft};
use crate::actions::{ExportArgs, LibraryAction};
use crate::formatters::print_output;
use anyhow::{Context as _, Result};
use forge_core::cli::ExitCode;
use forge_library::SkillRecord;
use serde::Serialize;
use tracing::{info, warn};

/// Summary of a skill for listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkillSummary {
    /// Skill id
    pub id: String,
    /// Skill name
    pub name: String,
    /// Skill description
    pub description: String,
    /// Number of files
    pub file_count: usize,
    /// Last update (RFC 3339)
    pub updated_at: String,
}

impl From<&SkillRecord> for SkillSummary {
    fn from(record: &SkillRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            file_count: record.file_count(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Result of listing the library.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListResult {
    /// Library directory
    pub library: String,
    /// Number of saved skills
    pub skill_count: usize,
    /// Skills, newest first
    pub skills: Vec<SkillSummary>,
}

/// Result of clearing the library.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClearResult {
    /// Number of skills removed
    pub removed: usize,
}

/// Runs the library command.
///
/// # Errors
///
/// Returns an error if the library cannot be opened, the id matches no
/// single skill, or the requested operation fails.
pub fn run(ctx: &Context, action: LibraryAction) -> Result<ExitCode> {
    match action {
        LibraryAction::List => list(ctx),
        LibraryAction::Show { id } => show(ctx, &id),
        LibraryAction::Export { id, export } => export_record(ctx, &id, &export),
        LibraryAction::Clear { yes } => clear(ctx, yes),
    }
}

/// Lists saved skills.
///
/// # Errors
///
/// Returns an error if the library cannot be opened.
pub fn list(ctx: &Context) -> Result<ExitCode> {
    let library = ctx.library()?;
    if library.is_empty() {
        warn!("No saved skills in {}", library.backend().dir().display());
    }

    let result = ListResult {
        library: library.backend().dir().display().to_string(),
        skill_count: library.len(),
        skills: library.list().iter().map(SkillSummary::from).collect(),
    };
    print_output(&result, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

/// Shows one saved skill, including file contents.
///
/// # Errors
///
/// Returns an error if `id` matches no single skill.
pub fn show(ctx: &Context, id: &str) -> Result<ExitCode> {
    let library = ctx.library()?;
    let record = library.lookup(id)?;
    print_output(record, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

/// Reopens a saved skill and exports it.
///
/// The archive is named after the skill unless `--name` is given.
///
/// # Errors
///
/// Returns an error if `id` matches no single skill or the archive cannot
/// be written.
pub fn export_record(ctx: &Context, id: &str, args: &ExportArgs) -> Result<ExitCode> {
    let library = ctx.library()?;
    let record = library.lookup(id)?;

    let mut bench = ctx.workbench()?;
    bench.open_record(record);
    let mut sink = ctx.prepare_export(&mut bench, args)?;
    let result: ExportResult = export_draft(&bench, &mut sink)?;

    info!("Exported '{}' to {}", record.name, result.path);
    print_output(&result, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

/// Removes every saved skill after confirmation.
///
/// # Errors
///
/// Returns an error if confirmation cannot be read or the library file
/// cannot be removed.
pub fn clear(ctx: &Context, yes: bool) -> Result<ExitCode> {
    let mut library = ctx.library()?;
    let removed = library.len();

    if !yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {removed} saved skill(s)?"))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;

        if !confirmed {
            info!("Library clear cancelled by user");
            return Ok(ExitCode::SUCCESS);
        }
    }

    library.clear()?;
    info!("Removed {} saved skill(s)", removed);
    print_output(&ClearResult { removed }, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

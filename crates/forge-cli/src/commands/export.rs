//! Export command implementation.
//!
//! Parses assistant output and writes the files as an archive.

use super::common::{Context, export_draft, read_input};
use crate::actions::ExportArgs;
use crate::formatters::print_output;
use anyhow::Result;
use forge_core::cli::ExitCode;
use std::path::Path;
use tracing::info;

/// Runs the export command.
///
/// # Errors
///
/// Returns an error if the input holds no file blocks, the archive
/// format is unknown, or the archive cannot be written.
pub fn run(ctx: &Context, input: &Path, args: &ExportArgs) -> Result<ExitCode> {
    let text = read_input(input)?;
    let mut bench = ctx.workbench()?;
    bench.apply_generated(&text)?;

    let mut sink = ctx.prepare_export(&mut bench, args)?;
    let result = export_draft(&bench, &mut sink)?;

    info!("Wrote {} ({} bytes)", result.path, result.size);
    print_output(&result, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

//! Cookbook command implementation.

use super::common::{Context, ExportResult, export_draft};
use super::save::SaveResult;
use crate::actions::CookbookAction;
use crate::formatters::print_output;
use anyhow::Result;
use forge_core::Error;
use forge_core::cli::ExitCode;
use forge_workbench::{CookbookPattern, PATTERNS, find_pattern};
use serde::Serialize;
use tracing::info;

/// A pattern as listed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PatternSummary {
    /// 1-based number accepted by `show` and `use`
    pub number: usize,
    /// Slug accepted by `show` and `use`
    pub slug: String,
    /// Display title
    pub title: String,
    /// What the skill does
    pub description: String,
    /// Suggested layout
    pub architecture: String,
}

/// Result of scaffolding a pattern.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UseResult {
    /// Archive written
    pub export: ExportResult,
    /// Library entry, when `--save` was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SaveResult>,
}

/// Runs the cookbook command.
///
/// # Errors
///
/// Returns an error if the pattern is unknown or exporting or saving
/// fails.
pub fn run(ctx: &Context, action: CookbookAction) -> Result<ExitCode> {
    match action {
        CookbookAction::List => {
            let patterns: Vec<PatternSummary> = PATTERNS
                .iter()
                .enumerate()
                .map(|(i, p)| PatternSummary {
                    number: i + 1,
                    slug: p.slug(),
                    title: p.title.to_string(),
                    description: p.description.to_string(),
                    architecture: p.architecture.to_string(),
                })
                .collect();
            print_output(&patterns, ctx.format)?;
        }
        CookbookAction::Show { pattern } => {
            println!("{}", resolve(&pattern)?.scaffold_text());
        }
        CookbookAction::Use {
            pattern,
            save,
            export,
        } => {
            let pattern = resolve(&pattern)?;
            let mut bench = ctx.workbench()?;
            bench.scaffold(pattern)?;

            let mut sink = ctx.prepare_export(&mut bench, &export)?;
            let export = export_draft(&bench, &mut sink)?;

            let saved = if save {
                let mut library = ctx.library()?;
                let record = bench.save_to(&mut library)?;
                Some(SaveResult::new(&record, library.backend().dir()))
            } else {
                None
            };

            info!("Scaffolded '{}'", pattern.title);
            print_output(&UseResult { export, saved }, ctx.format)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn resolve(query: &str) -> Result<&'static CookbookPattern> {
    Ok(find_pattern(query).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "unknown pattern '{query}' (run `cookbook list` to see the choices)"
        ))
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::exit_code_for;

    #[test]
    fn test_resolve_unknown_pattern_is_invalid_input() {
        let err = resolve("no-such-pattern").unwrap_err();
        assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_resolve_by_number() {
        assert_eq!(resolve("4").unwrap().title, "React Logic Scaffolder");
    }
}

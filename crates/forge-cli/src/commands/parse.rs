//! Parse command implementation.
//!
//! Shows which files a piece of assistant output would produce without
//! writing anything.

use super::common::{Context, read_input};
use crate::formatters::print_output;
use anyhow::Result;
use forge_core::cli::ExitCode;
use forge_files::FileSet;
use forge_workbench::ApplyOutcome;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// One parsed file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileSummary {
    /// Path as written in the marker
    pub path: String,
    /// Preview language
    pub language: String,
    /// Content size in bytes
    pub size: usize,
    /// Whether this is an instruction file
    pub instruction: bool,
}

/// Result of parsing input.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ParseResult {
    /// Resolved package name
    pub name: String,
    /// Number of file blocks
    pub file_count: usize,
    /// Files in order of appearance
    pub files: Vec<FileSummary>,
    /// Paths that appear more than once; the last copy is exported
    pub duplicates: Vec<String>,
}

impl ParseResult {
    /// Describes a draft.
    #[must_use]
    pub fn from_draft(draft: &FileSet) -> Self {
        Self {
            name: draft.draft_name().to_string(),
            file_count: draft.len(),
            files: draft
                .iter()
                .map(|f| FileSummary {
                    path: f.path().to_string(),
                    language: f.language().to_string(),
                    size: f.size(),
                    instruction: f.is_instruction(),
                })
                .collect(),
            duplicates: draft
                .duplicate_paths()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Runs the parse command.
///
/// Input without any file blocks is reported as an empty result.
///
/// # Errors
///
/// Returns an error if the input cannot be read, or in strict mode if it
/// holds a malformed block.
pub fn run(ctx: &Context, input: &Path) -> Result<ExitCode> {
    let text = read_input(input)?;
    let mut bench = ctx.workbench()?;

    if bench.apply_generated(&text)? == ApplyOutcome::NoFiles {
        warn!("No [FILE: ...] blocks found in {}", input.display());
    }

    let result = ParseResult::from_draft(bench.draft());
    info!("Parsed {} file(s) for '{}'", result.file_count, result.name);
    print_output(&result, ctx.format)?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_files::FileRecord;

    #[test]
    fn test_parse_result_from_draft() {
        let mut draft = FileSet::new();
        draft.replace_all(
            vec![
                FileRecord::new("SKILL.md", "name: kit"),
                FileRecord::new("run.py", "a"),
                FileRecord::new("run.py", "b"),
            ],
            "kit",
        );

        let result = ParseResult::from_draft(&draft);

        assert_eq!(result.name, "kit");
        assert_eq!(result.file_count, 3);
        assert!(result.files[0].instruction);
        assert_eq!(result.files[1].language, "python");
        assert_eq!(result.duplicates, vec!["run.py"]);
    }

    #[test]
    fn test_empty_result_serialization() {
        let result = ParseResult::from_draft(&FileSet::new());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"name\":\"untitled-project\""));
        assert!(json.contains("\"files\":[]"));
    }
}

//! Generate command implementation.
//!
//! Sends one prompt to the configured completion command, streams the
//! reply and turns any `[FILE: path]` blocks in it into a package.

use super::common::{Context, ExportResult, export_draft};
use super::parse::ParseResult;
use super::save::SaveResult;
use crate::actions::ExportArgs;
use crate::formatters::print_output;
use anyhow::Result;
use forge_core::cli::{ExitCode, OutputFormat};
use forge_workbench::CommandProvider;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// What to do with the generated files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Write an archive
    pub export: bool,
    /// Save to the library
    pub save: bool,
    /// Archive settings
    pub export_args: ExportArgs,
}

/// Result of a generation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateResult {
    /// Completion command used
    pub provider: String,
    /// Reply text; omitted when it was streamed to the terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Parsed package, when the reply contained files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<ParseResult>,
    /// Archive written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportResult>,
    /// Library entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SaveResult>,
}

/// Runs the generate command.
///
/// In pretty mode the reply is streamed to stdout as it arrives; the
/// other formats include it in the result instead.
///
/// # Errors
///
/// Returns an error if no completion command is configured, the command
/// fails, or exporting or saving was requested for a reply without files.
pub async fn run(ctx: &Context, prompt: &str, options: &GenerateOptions) -> Result<ExitCode> {
    let provider = CommandProvider::from_config(&ctx.config.provider)?;
    let mut bench = ctx.workbench()?;
    let stream = ctx.format == OutputFormat::Pretty;

    info!("Generating with '{}'", provider.program());
    let reply = if stream {
        let mut stdout = std::io::stdout();
        let reply = bench
            .send_streaming(prompt, &provider, &mut |chunk: &str| {
                let _ = stdout.write_all(chunk.as_bytes());
                let _ = stdout.flush();
            })
            .await?;
        println!();
        reply
    } else {
        bench.send(prompt, &provider).await?
    };

    let package = if reply.outcome.is_applied() {
        Some(ParseResult::from_draft(bench.draft()))
    } else {
        warn!("Reply contained no [FILE: ...] blocks");
        None
    };

    let export = if options.export {
        let mut sink = ctx.prepare_export(&mut bench, &options.export_args)?;
        Some(export_draft(&bench, &mut sink)?)
    } else {
        None
    };

    let saved = if options.save {
        let mut library = ctx.library()?;
        let record = bench.save_to(&mut library)?;
        Some(SaveResult::new(&record, library.backend().dir()))
    } else {
        None
    };

    let result = GenerateResult {
        provider: provider.program().to_string(),
        reply: (!stream).then_some(reply.text),
        package,
        export,
        saved,
    };
    print_output(&result, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

//! Config command implementation.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/skill-forge/config.toml`
//! - macOS: `~/Library/Application Support/skill-forge/config.toml`
//! - Windows: `%APPDATA%\skill-forge\config.toml`
//!
//! `--config` overrides the location for every command.

use super::common::Context;
use crate::actions::ConfigAction;
use crate::formatters::print_output;
use anyhow::{Result, bail};
use forge_core::ForgeConfig;
use forge_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use tracing::info;

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Where the file was written
    pub path: String,
    /// Whether an existing file was replaced
    pub overwritten: bool,
}

/// Configuration file location.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PathResult {
    /// Config file path
    pub path: String,
    /// Whether the file exists
    pub exists: bool,
    /// Library directory in effect
    pub data_dir: String,
}

/// Runs the config command.
///
/// # Errors
///
/// Returns an error if the file cannot be written, or already exists
/// without `--force`.
pub fn run(ctx: &Context, action: ConfigAction) -> Result<ExitCode> {
    info!("Config action: {:?}", action);

    match action {
        ConfigAction::Init { force } => init(ctx, force),
        ConfigAction::Show => {
            match ctx.format {
                OutputFormat::Pretty => print!("{}", ctx.config.to_toml_string()?),
                format => print_output(&ctx.config, format)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Path => {
            let result = PathResult {
                path: ctx.config_path.display().to_string(),
                exists: ctx.config_path.exists(),
                data_dir: ctx.config.data_dir().display().to_string(),
            };
            print_output(&result, ctx.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Writes a default configuration file.
fn init(ctx: &Context, force: bool) -> Result<ExitCode> {
    let path = &ctx.config_path;
    let existed = path.exists();
    if existed && !force {
        bail!(
            "configuration already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    ForgeConfig::default().save(path)?;
    info!("Wrote default configuration to {}", path.display());

    let result = InitResult {
        path: path.display().to_string(),
        overwritten: existed,
    };
    print_output(&result, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

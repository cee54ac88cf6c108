//! Shared setup for CLI commands.
//!
//! Every command starts from a [`Context`]: the loaded configuration with
//! command-line overrides applied and the chosen output format.

use crate::actions::ExportArgs;
use anyhow::{Context as _, Result};
use forge_archive::{ArchiveFormat, DirectorySink};
use forge_core::cli::{ExitCode, OutputFormat};
use forge_core::{Error, ForgeConfig};
use forge_library::{FileStore, LibraryStore};
use forge_workbench::Workbench;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration after overrides.
    pub config: ForgeConfig,
    /// File the configuration was read from, or would be.
    pub config_path: PathBuf,
    /// Output format for results.
    pub format: OutputFormat,
}

impl Context {
    /// Loads configuration and applies global overrides.
    ///
    /// `format` falls back to `general.default_format` when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or `format`
    /// is not a known output format.
    pub fn load(
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        format: Option<&str>,
    ) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(ForgeConfig::default_path);
        let mut config = ForgeConfig::load_or_default(Some(config_path.as_path()))?;
        if let Some(dir) = data_dir {
            config.general.data_dir = Some(dir);
        }

        let format = format
            .unwrap_or(&config.general.default_format)
            .parse::<OutputFormat>()?;

        debug!(path = %config_path.display(), %format, "configuration ready");
        Ok(Self {
            config,
            config_path,
            format,
        })
    }

    /// Context with default configuration, for tests and embedding.
    #[must_use]
    pub fn with_config(config: ForgeConfig, format: OutputFormat) -> Self {
        Self {
            config,
            config_path: ForgeConfig::default_path(),
            format,
        }
    }

    /// Opens the saved library under the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn library(&self) -> Result<LibraryStore<FileStore>> {
        let dir = self.config.data_dir();
        let store = FileStore::new(&dir)
            .with_context(|| format!("failed to open library in {}", dir.display()))?;
        Ok(LibraryStore::open(store))
    }

    /// Starts a fresh editing session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured export format is unknown.
    pub fn workbench(&self) -> Result<Workbench> {
        Ok(Workbench::new(&self.config)?)
    }

    /// Applies `--archive` and `--name` to `bench` and returns the sink
    /// for `--out-dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `--archive` names an unknown format.
    pub fn prepare_export(&self, bench: &mut Workbench, args: &ExportArgs) -> Result<DirectorySink> {
        if let Some(archive) = &args.archive {
            bench.set_export_format(archive.parse::<ArchiveFormat>()?);
        }
        if let Some(name) = &args.name {
            bench.set_export_name(name.as_str());
        }
        let dir = args
            .out_dir
            .clone()
            .or_else(|| self.config.export.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(DirectorySink::new(dir))
    }
}

/// Reads command input from a file, or stdin when `input` is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read as UTF-8 text.
pub fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Summary of an archive written to disk.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportResult {
    /// Archive file name
    pub file_name: String,
    /// Where it was written
    pub path: String,
    /// Container format
    pub format: String,
    /// MIME type
    pub content_type: String,
    /// Archive size in bytes
    pub size: usize,
    /// Number of files packaged
    pub file_count: usize,
}

/// Exports the session draft through `sink` and describes the result.
///
/// # Errors
///
/// Returns an error if the draft is empty or the archive cannot be
/// written.
pub fn export_draft(bench: &Workbench, sink: &mut DirectorySink) -> Result<ExportResult> {
    let archive = bench.export(sink)?;
    Ok(ExportResult {
        path: sink.path_for(&archive).display().to_string(),
        file_name: archive.file_name,
        format: archive.format.to_string(),
        content_type: archive.content_type.to_string(),
        size: archive.bytes.len(),
        file_count: archive.file_count,
    })
}

/// Maps a command error onto the process exit code.
///
/// Library errors anywhere in the chain decide the code; anything else
/// is a general failure.
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exit_code_for_library_error() {
        let err = anyhow::Error::new(Error::EmptyBundle {
            operation: "export".to_string(),
        })
        .context("exporting draft");
        assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);

        let err = anyhow::Error::new(Error::upstream("llm", "down"));
        assert_eq!(exit_code_for(&err), ExitCode::UPSTREAM_ERROR);

        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), ExitCode::ERROR);
    }

    #[test]
    fn test_load_applies_overrides() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::load(
            Some(temp.path().join("missing.toml")),
            Some(temp.path().join("data")),
            Some("json"),
        )
        .unwrap();
        assert_eq!(ctx.format, OutputFormat::Json);
        assert_eq!(ctx.config.data_dir(), temp.path().join("data"));
    }

    #[test]
    fn test_load_uses_configured_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[general]\ndefault_format = \"text\"\n").unwrap();

        let ctx = Context::load(Some(path), None, None).unwrap();
        assert_eq!(ctx.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let temp = TempDir::new().unwrap();
        let err = Context::load(Some(temp.path().join("none.toml")), None, Some("yaml")).unwrap_err();
        assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_export_draft_counts_archived_entries() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::with_config(ForgeConfig::default(), OutputFormat::Json);
        let mut bench = ctx.workbench().unwrap();
        bench
            .apply_generated("[FILE: a.md]\nold\n[FILE: ./a.md]\nnew")
            .unwrap();
        let args = ExportArgs {
            archive: Some("manifest".to_string()),
            out_dir: Some(temp.path().to_path_buf()),
            name: Some("dup".to_string()),
        };
        let mut sink = ctx.prepare_export(&mut bench, &args).unwrap();

        let result = export_draft(&bench, &mut sink).unwrap();

        assert_eq!(bench.draft().resolved_files().len(), 2);
        assert_eq!(result.file_count, 1);
        let written = std::fs::read_to_string(temp.path().join("dup.txt")).unwrap();
        assert_eq!(written, "--- FILE: a.md ---\nnew");
    }

    #[test]
    fn test_prepare_export_overrides() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::with_config(ForgeConfig::default(), OutputFormat::Json);
        let mut bench = ctx.workbench().unwrap();
        let args = ExportArgs {
            archive: Some("tgz".to_string()),
            out_dir: Some(temp.path().to_path_buf()),
            name: Some("custom".to_string()),
        };

        let sink = ctx.prepare_export(&mut bench, &args).unwrap();

        assert_eq!(sink.dir(), temp.path());
        assert_eq!(bench.export_format(), ArchiveFormat::TarGz);
        assert_eq!(bench.export_name(), "custom");
    }
}

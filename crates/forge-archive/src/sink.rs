//! Delivering finished archives.

use crate::builder::{Archive, ArchiveBuilder};
use forge_core::{Error, Result};
use forge_files::FileSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Receives finished archives.
///
/// A sink only ever sees complete artifacts: [`export`] builds first and
/// delivers only on success.
pub trait DownloadSink {
    /// Stores or offers the archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArchiveWriteError`] if the archive cannot be
    /// delivered.
    fn deliver(&mut self, archive: &Archive) -> Result<()>;
}

/// Writes archives into a directory.
///
/// Each archive is written to `<name>.part` and renamed into place, so a
/// failed write never leaves a file under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`. The directory is created on the
    /// first delivery.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `archive` ends up once delivered.
    #[must_use]
    pub fn path_for(&self, archive: &Archive) -> PathBuf {
        self.dir.join(&archive.file_name)
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, archive: &Archive) -> Result<()> {
        let target = self.path_for(archive);
        let partial = self.dir.join(format!("{}.part", archive.file_name));

        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::archive_write(format!("cannot create {}", self.dir.display()), e)
        })?;
        fs::write(&partial, &archive.bytes)
            .map_err(|e| Error::archive_write(format!("cannot write {}", partial.display()), e))?;
        if let Err(e) = fs::rename(&partial, &target) {
            let _ = fs::remove_file(&partial);
            return Err(Error::archive_write(
                format!("cannot move archive to {}", target.display()),
                e,
            ));
        }

        tracing::info!(path = %target.display(), bytes = archive.len(), "archive written");
        Ok(())
    }
}

/// Keeps delivered archives in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Archives in delivery order.
    pub delivered: Vec<Archive>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, archive: &Archive) -> Result<()> {
        self.delivered.push(archive.clone());
        Ok(())
    }
}

/// Builds an archive of `files` and hands it to `sink`.
///
/// # Errors
///
/// Returns [`Error::EmptyBundle`] for an empty draft and
/// [`Error::ArchiveWriteError`] if building or delivery fails. The sink is
/// not called when building fails.
///
/// # Examples
///
/// ```
/// use forge_archive::{ArchiveBuilder, ArchiveFormat, MemorySink, export};
/// use forge_files::FileSet;
///
/// let mut sink = MemorySink::new();
/// let err = export(&ArchiveBuilder::new(ArchiveFormat::Zip), &FileSet::new(), &mut sink)
///     .unwrap_err();
///
/// assert!(err.is_empty_bundle());
/// assert!(sink.delivered.is_empty());
/// ```
pub fn export(
    builder: &ArchiveBuilder,
    files: &FileSet,
    sink: &mut dyn DownloadSink,
) -> Result<Archive> {
    let archive = builder.build(files)?;
    sink.deliver(&archive)?;
    Ok(archive)
}

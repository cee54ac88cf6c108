//! Packaging a draft into a single downloadable artifact.
//!
//! Every format lays files out the same way: a top-level folder named
//! after the package, with each file at its relative path inside it. The
//! whole artifact is built in memory; nothing is returned unless every
//! entry was written.

use crate::format::ArchiveFormat;
use chrono::{DateTime, Datelike, Timelike, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use forge_core::{DEFAULT_PACKAGE_NAME, Error, Result};
use forge_files::FileSet;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

/// A finished artifact, ready to hand to a [`DownloadSink`](crate::DownloadSink).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Suggested file name, e.g. `ratio-kit.zip`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Format the bytes are in.
    pub format: ArchiveFormat,
    /// Encoded artifact.
    pub bytes: Vec<u8>,
    /// Number of file entries written, after duplicate paths collapse.
    pub file_count: usize,
}

impl Archive {
    /// Size of the artifact in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the artifact has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Builds an [`Archive`] from a draft.
///
/// # Examples
///
/// ```
/// use forge_archive::{ArchiveBuilder, ArchiveFormat};
/// use forge_files::{FileRecord, FileSet};
///
/// let mut draft = FileSet::new();
/// draft.replace_all(vec![FileRecord::new("SKILL.md", "name: demo")], "demo");
///
/// let archive = ArchiveBuilder::new(ArchiveFormat::Manifest)
///     .with_name("demo")
///     .build(&draft)
///     .unwrap();
///
/// assert_eq!(archive.file_name, "demo.txt");
/// assert_eq!(archive.bytes, b"--- FILE: SKILL.md ---\nname: demo");
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    format: ArchiveFormat,
    name: String,
    mtime: Option<DateTime<Utc>>,
}

impl ArchiveBuilder {
    /// Creates a builder for `format` with the default package name.
    #[must_use]
    pub fn new(format: ArchiveFormat) -> Self {
        Self {
            format,
            name: String::new(),
            mtime: None,
        }
    }

    /// Sets the package name. Blank names fall back to `skill-package`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the modification time stamped on every entry.
    ///
    /// Defaults to the time of the build.
    #[must_use]
    pub const fn with_mtime(mut self, mtime: DateTime<Utc>) -> Self {
        self.mtime = Some(mtime);
        self
    }

    /// The selected format.
    #[must_use]
    pub const fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Package name as it will appear in the artifact.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_archive::{ArchiveBuilder, ArchiveFormat};
    ///
    /// let builder = ArchiveBuilder::new(ArchiveFormat::Zip);
    /// assert_eq!(builder.package_name(), "skill-package");
    /// assert_eq!(builder.with_name(" team/kit ").package_name(), "team-kit");
    /// ```
    #[must_use]
    pub fn package_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() || name == "." || name == ".." {
            return DEFAULT_PACKAGE_NAME.to_string();
        }
        name.replace(['/', '\\'], "-")
    }

    /// File name the artifact will be offered under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.package_name(), self.format.extension())
    }

    /// Packages every file of `files`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBundle`] if `files` is empty, and
    /// [`Error::ArchiveWriteError`] if a path cannot be placed in an
    /// archive or the container cannot be encoded.
    pub fn build(&self, files: &FileSet) -> Result<Archive> {
        if files.is_empty() {
            return Err(Error::EmptyBundle {
                operation: "export".to_string(),
            });
        }

        let package = self.package_name();
        let entries = entries(files)?;
        let mtime = self.mtime.unwrap_or_else(Utc::now);

        let bytes = match self.format {
            ArchiveFormat::Zip => write_zip(&package, &entries, mtime)?,
            ArchiveFormat::TarGz => write_tar_gz(&package, &entries, mtime)?,
            ArchiveFormat::Manifest => write_manifest(&entries),
        };

        let archive = Archive {
            file_name: self.file_name(),
            content_type: self.format.content_type(),
            format: self.format,
            bytes,
            file_count: entries.len(),
        };

        tracing::info!(
            format = %self.format,
            files = archive.file_count,
            bytes = archive.len(),
            file_name = %archive.file_name,
            "archive built"
        );

        Ok(archive)
    }
}

fn invalid_path(path: &str, reason: &str) -> Error {
    Error::ArchiveWriteError {
        message: format!("cannot archive '{path}': {reason}"),
        source: None,
    }
}

/// Normalizes a record path to a relative archive entry path.
///
/// Leading `./` and `/` are dropped and empty segments collapse.
fn entry_path(path: &str) -> Result<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(invalid_path(path, "parent directory segments are not allowed")),
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return Err(invalid_path(path, "path is empty"));
    }
    Ok(segments.join("/"))
}

/// One entry per normalized path; the later record wins and keeps the
/// earlier position.
fn entries(files: &FileSet) -> Result<Vec<(String, &str)>> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<(String, &str)> = Vec::with_capacity(files.len());

    for file in files {
        let path = entry_path(file.path())?;
        if let Some(&slot) = slots.get(&path) {
            tracing::warn!(path = %path, "duplicate path in draft, keeping the later file");
            out[slot].1 = file.content();
        } else {
            slots.insert(path.clone(), out.len());
            out.push((path, file.content()));
        }
    }

    Ok(out)
}

fn zip_timestamp(mtime: DateTime<Utc>) -> zip::DateTime {
    let fields = (
        u16::try_from(mtime.year()),
        u8::try_from(mtime.month()),
        u8::try_from(mtime.day()),
        u8::try_from(mtime.hour()),
        u8::try_from(mtime.minute()),
        u8::try_from(mtime.second()),
    );
    match fields {
        (Ok(year), Ok(month), Ok(day), Ok(hour), Ok(minute), Ok(second)) => {
            zip::DateTime::from_date_and_time(year, month, day, hour, minute, second)
                .unwrap_or_default()
        }
        _ => zip::DateTime::default(),
    }
}

fn write_zip(package: &str, entries: &[(String, &str)], mtime: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stamp = zip_timestamp(mtime);

    let dir_options = FileOptions::default()
        .last_modified_time(stamp)
        .unix_permissions(DIR_MODE);
    let file_options = FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(stamp)
        .unix_permissions(FILE_MODE);

    zip.add_directory(format!("{package}/"), dir_options)
        .map_err(|e| Error::archive_write("zip directory entry", e))?;

    for (path, content) in entries {
        let name = format!("{package}/{path}");
        zip.start_file(name.as_str(), file_options)
            .map_err(|e| Error::archive_write(format!("zip entry {name}"), e))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| Error::archive_write(format!("zip entry {name}"), e))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| Error::archive_write("zip finalize", e))?;
    Ok(cursor.into_inner())
}

fn write_tar_gz(
    package: &str,
    entries: &[(String, &str)],
    mtime: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut tar = tar::Builder::new(encoder);
    let seconds = u64::try_from(mtime.timestamp()).unwrap_or(0);

    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(DIR_MODE);
    dir.set_mtime(seconds);
    tar.append_data(&mut dir, format!("{package}/"), std::io::empty())
        .map_err(|e| Error::archive_write("tar directory entry", e))?;

    for (path, content) in entries {
        let name = format!("{package}/{path}");
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(FILE_MODE);
        header.set_mtime(seconds);
        tar.append_data(&mut header, &name, content.as_bytes())
            .map_err(|e| Error::archive_write(format!("tar entry {name}"), e))?;
    }

    let encoder = tar
        .into_inner()
        .map_err(|e| Error::archive_write("tar finalize", e))?;
    encoder
        .finish()
        .map_err(|e| Error::archive_write("gzip finalize", e))
}

fn write_manifest(entries: &[(String, &str)]) -> Vec<u8> {
    entries
        .iter()
        .map(|(path, content)| format!("--- FILE: {path} ---\n{content}"))
        .collect::<Vec<_>>()
        .join("\n\n")
        .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use forge_files::FileRecord;

    fn draft(files: &[(&str, &str)]) -> FileSet {
        let mut set = FileSet::new();
        set.replace_all(
            files.iter().map(|(p, c)| FileRecord::new(*p, *c)).collect(),
            "draft",
        );
        set
    }

    #[test]
    fn test_empty_draft_rejected() {
        for format in ArchiveFormat::ALL {
            let err = ArchiveBuilder::new(format).build(&FileSet::new()).unwrap_err();
            assert!(err.is_empty_bundle());
        }
    }

    #[test]
    fn test_entry_path_normalization() {
        assert_eq!(entry_path("./scripts//run.py").unwrap(), "scripts/run.py");
        assert_eq!(entry_path("/SKILL.md").unwrap(), "SKILL.md");
        assert!(entry_path("").unwrap_err().is_archive_write_error());
        assert!(entry_path("./").is_err());
        assert!(entry_path("../etc/passwd").is_err());
    }

    #[test]
    fn test_entries_later_wins_in_first_position() {
        let set = draft(&[("a.md", "1"), ("b.md", "2"), ("./a.md", "3")]);
        let entries = entries(&set).unwrap();
        assert_eq!(
            entries,
            vec![("a.md".to_string(), "3"), ("b.md".to_string(), "2")]
        );
    }

    #[test]
    fn test_file_count_matches_written_entries() {
        let set = draft(&[("a.md", "1"), ("b.md", "2"), ("./a.md", "3")]);
        for format in ArchiveFormat::ALL {
            let archive = ArchiveBuilder::new(format).build(&set).unwrap();
            assert_eq!(archive.file_count, 2);
        }
    }

    #[test]
    fn test_manifest_layout() {
        let set = draft(&[("SKILL.md", "name: x"), ("run.py", "print()")]);
        let archive = ArchiveBuilder::new(ArchiveFormat::Manifest)
            .build(&set)
            .unwrap();
        assert_eq!(
            String::from_utf8(archive.bytes).unwrap(),
            "--- FILE: SKILL.md ---\nname: x\n\n--- FILE: run.py ---\nprint()"
        );
        assert_eq!(archive.file_name, "skill-package.txt");
    }

    #[test]
    fn test_package_name_fallbacks() {
        let builder = ArchiveBuilder::new(ArchiveFormat::Zip);
        assert_eq!(builder.clone().with_name("   ").package_name(), DEFAULT_PACKAGE_NAME);
        assert_eq!(builder.clone().with_name("..").package_name(), DEFAULT_PACKAGE_NAME);
        assert_eq!(builder.with_name("a\\b").package_name(), "a-b");
    }

    #[test]
    fn test_build_is_deterministic_with_fixed_mtime() {
        let set = draft(&[("SKILL.md", "name: x"), ("a.md", "a"), ("a.md", "b")]);
        let mtime = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for format in ArchiveFormat::ALL {
            let builder = ArchiveBuilder::new(format).with_name("x").with_mtime(mtime);
            assert_eq!(builder.build(&set).unwrap(), builder.build(&set).unwrap());
        }
    }

    #[test]
    fn test_zip_timestamp_out_of_range_falls_back() {
        let early = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(zip_timestamp(early).year(), 1980);
    }
}

//! Output formats.

use forge_core::Error;
use std::fmt;
use std::str::FromStr;

/// Container format for an exported package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveFormat {
    /// Deflate-compressed zip archive.
    #[default]
    Zip,
    /// Gzip-compressed tarball.
    TarGz,
    /// Plain-text concatenation of every file, for pasting or review.
    Manifest,
}

impl ArchiveFormat {
    /// Every supported format.
    pub const ALL: [Self; 3] = [Self::Zip, Self::TarGz, Self::Manifest];

    /// File extension without the leading dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::Manifest => "txt",
        }
    }

    /// MIME type of the produced bytes.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Zip => "application/zip",
            Self::TarGz => "application/gzip",
            Self::Manifest => "text/plain; charset=utf-8",
        }
    }

    /// Name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar-gz",
            Self::Manifest => "manifest",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveFormat {
    type Err = Error;

    /// Parses a format name.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_archive::ArchiveFormat;
    ///
    /// assert_eq!("zip".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
    /// assert_eq!("tar.gz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
    /// assert!("rar".parse::<ArchiveFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar-gz" | "tar.gz" | "tgz" => Ok(Self::TarGz),
            "manifest" | "txt" | "text" => Ok(Self::Manifest),
            other => Err(Error::InvalidArgument(format!(
                "unknown archive format '{other}' (expected zip, tar-gz or manifest)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for format in ArchiveFormat::ALL {
            assert_eq!(format.as_str().parse::<ArchiveFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ArchiveFormat::Zip.extension(), "zip");
        assert_eq!(ArchiveFormat::TarGz.extension(), "tar.gz");
        assert_eq!(ArchiveFormat::Manifest.extension(), "txt");
    }

    #[test]
    fn test_tar_gz_is_labelled_gzip() {
        assert_eq!(ArchiveFormat::TarGz.content_type(), "application/gzip");
    }

    #[test]
    fn test_unknown_format() {
        let err = "7z".parse::<ArchiveFormat>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}

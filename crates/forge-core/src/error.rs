//! Error types for skill-forge.
//!
//! One taxonomy covers the whole pipeline: parsing model output, bundling
//! a draft into an archive, promoting it into the library and talking to
//! the completion provider. None of these errors is fatal to a session;
//! callers degrade to a local, recoverable state.
//!
//! # Examples
//!
//! ```
//! use forge_core::{Error, Result};
//!
//! fn export(file_count: usize) -> Result<()> {
//!     if file_count == 0 {
//!         return Err(Error::EmptyBundle {
//!             operation: "export".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = export(0).unwrap_err();
//! assert!(err.is_empty_bundle());
//! ```

use thiserror::Error;

/// Main error type for skill-forge.
#[derive(Error, Debug)]
pub enum Error {
    /// Export or save attempted on a draft with zero files.
    ///
    /// Front ends surface this as a disabled control rather than a dialog.
    #[error("cannot {operation}: the draft contains no files")]
    EmptyBundle {
        /// The operation that was refused (`export`, `save`, ...)
        operation: String,
    },

    /// Serializing a container failed.
    ///
    /// No partial archive is ever handed to a download sink when this is
    /// returned, and the draft is left untouched so the user can retry.
    #[error("archive write failed: {message}")]
    ArchiveWriteError {
        /// Description of the failure
        message: String,
        /// Underlying error cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion call failed or produced no usable text.
    #[error("assistant unavailable ({provider}): {reason}")]
    UpstreamUnavailable {
        /// Name of the completion provider
        provider: String,
        /// Why the call produced nothing usable
        reason: String,
    },

    /// A file block could not be accepted by the strict validation pass.
    ///
    /// The permissive parser never returns this.
    #[error("malformed file block at byte {offset}: {reason}")]
    MalformedFileBlock {
        /// Byte offset of the `[FILE:` marker in the input
        offset: usize,
        /// What is wrong with the block
        reason: String,
    },

    /// The key-value backend failed to read or write.
    #[error("storage error for key '{key}': {message}")]
    Storage {
        /// Storage key involved
        key: String,
        /// Description of the failure
        message: String,
    },

    /// Configuration is invalid or could not be loaded.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument passed to an operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON conversion failed.
    #[error("serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    /// Builds an [`Error::ArchiveWriteError`] from any error source.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::Error;
    ///
    /// let io = std::io::Error::other("disk full");
    /// let err = Error::archive_write("failed to finish tarball", io);
    /// assert!(err.is_archive_write_error());
    /// ```
    pub fn archive_write(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ArchiveWriteError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Builds an [`Error::UpstreamUnavailable`].
    pub fn upstream(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an empty bundle error.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::Error;
    ///
    /// let err = Error::EmptyBundle { operation: "save".to_string() };
    /// assert!(err.is_empty_bundle());
    /// ```
    #[must_use]
    pub const fn is_empty_bundle(&self) -> bool {
        matches!(self, Self::EmptyBundle { .. })
    }

    /// Returns `true` if this is an archive write error.
    #[must_use]
    pub const fn is_archive_write_error(&self) -> bool {
        matches!(self, Self::ArchiveWriteError { .. })
    }

    /// Returns `true` if the completion provider was unavailable.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::Error;
    ///
    /// let err = Error::upstream("command", "exit status 1");
    /// assert!(err.is_upstream_unavailable());
    /// ```
    #[must_use]
    pub const fn is_upstream_unavailable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    /// Returns `true` if this is a malformed file block error.
    #[must_use]
    pub const fn is_malformed_block(&self) -> bool {
        matches!(self, Self::MalformedFileBlock { .. })
    }

    /// Returns `true` if this is a storage error.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if the user can recover by changing input and retrying.
    ///
    /// Storage and serialization failures are environmental; everything
    /// else is resolved by the user acting differently.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyBundle { .. }
                | Self::UpstreamUnavailable { .. }
                | Self::MalformedFileBlock { .. }
                | Self::InvalidArgument(_)
                | Self::ArchiveWriteError { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::SerializationError {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Result type alias for skill-forge operations.
///
/// # Examples
///
/// ```
/// use forge_core::{Error, Result};
///
/// fn non_blank(value: &str) -> Result<&str> {
///     if value.trim().is_empty() {
///         return Err(Error::InvalidArgument("value is blank".to_string()));
///     }
///     Ok(value)
/// }
///
/// assert!(non_blank("x").is_ok());
/// assert!(non_blank("  ").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

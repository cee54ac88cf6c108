//! Configuration for skill-forge.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/skill-forge/config.toml`
//! - macOS: `~/Library/Application Support/skill-forge/config.toml`
//! - Windows: `%APPDATA%\skill-forge\config.toml`
//!
//! Every section and every field has a default, so a missing file or a
//! partial file is always valid.
//!
//! ```toml
//! [general]
//! default_format = "pretty"
//! log_level = "info"
//!
//! [parser]
//! fallback_name = "untitled-project"
//! strict = false
//!
//! [export]
//! format = "zip"
//! package_name = "skill-package"
//!
//! [provider]
//! command = "llm"
//! args = ["--no-stream"]
//! timeout_secs = 120
//! ```
//!
//! # Examples
//!
//! ```
//! use forge_core::ForgeConfig;
//!
//! let config: ForgeConfig = toml::from_str("[export]\nformat = \"tar-gz\"\n").unwrap();
//! assert_eq!(config.export.format, "tar-gz");
//! assert_eq!(config.parser.fallback_name, "untitled-project");
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Draft name used before any instruction file names the package.
pub const DEFAULT_FALLBACK_NAME: &str = "untitled-project";

/// Package name used by exports when the chosen name is blank.
pub const DEFAULT_PACKAGE_NAME: &str = "skill-package";

const APP_DIR: &str = "skill-forge";
const CONFIG_FILE: &str = "config.toml";
const VALID_OUTPUT_FORMATS: [&str; 3] = ["json", "text", "pretty"];
const VALID_ARCHIVE_FORMATS: [&str; 3] = ["zip", "tar-gz", "manifest"];
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ForgeConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Content parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Archive export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format (json, text, pretty)
    pub default_format: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Directory holding the library; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Content parser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Package name used when no instruction file names one
    pub fallback_name: String,

    /// Reject empty paths and malformed markers instead of skipping them
    pub strict: bool,
}

/// Archive export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Container format (zip, tar-gz, manifest)
    pub format: String,

    /// Package name used when the chosen name is blank
    pub package_name: String,

    /// Where archives are written; current directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

/// Completion provider settings.
///
/// The provider is an external program that reads the rendered
/// conversation on stdin and writes the reply to stdout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Program to run; generation is disabled when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments passed to the program
    pub args: Vec<String>,

    /// Seconds before the call is abandoned
    pub timeout_secs: u64,

    /// Overrides the built-in assistant brief
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_format: "pretty".to_string(),
            log_level: "info".to_string(),
            data_dir: None,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fallback_name: DEFAULT_FALLBACK_NAME.to_string(),
            strict: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: "zip".to_string(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            out_dir: None,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: 120,
            system_instruction: None,
        }
    }
}

impl ForgeConfig {
    /// Returns the platform default config file location.
    ///
    /// Falls back to the current directory when the platform has no
    /// config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read, is not
    /// valid TOML, or fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Error::ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| Error::ConfigError {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the config file if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists and is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        if path.exists() {
            Self::load(&path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Writes the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if serialization or writing fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::ConfigError {
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }
        let raw = self.to_toml_string()?;
        fs::write(path, raw).map_err(|e| Error::ConfigError {
            message: format!("failed to write {}: {e}", path.display()),
        })
    }

    /// Serializes the configuration to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if TOML serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize configuration: {e}"),
        })
    }

    /// Directory holding the library.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.general.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first invalid field.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::ForgeConfig;
    ///
    /// let mut config = ForgeConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.export.format = "rar".to_string();
    /// assert!(config.validate().unwrap_err().is_config_error());
    /// ```
    pub fn validate(&self) -> Result<()> {
        check_one_of(
            "general.default_format",
            &self.general.default_format,
            &VALID_OUTPUT_FORMATS,
        )?;
        check_one_of(
            "general.log_level",
            &self.general.log_level,
            &VALID_LOG_LEVELS,
        )?;
        check_one_of("export.format", &self.export.format, &VALID_ARCHIVE_FORMATS)?;

        if self.parser.fallback_name.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "parser.fallback_name cannot be blank".to_string(),
            });
        }

        if self.provider.timeout_secs == 0 {
            return Err(Error::ConfigError {
                message: "provider.timeout_secs must be greater than zero".to_string(),
            });
        }

        if let Some(command) = &self.provider.command
            && command.trim().is_empty()
        {
            return Err(Error::ConfigError {
                message: "provider.command cannot be blank".to_string(),
            });
        }

        Ok(())
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError {
            message: format!(
                "invalid {field} '{value}', must be one of: {}",
                allowed.join(", ")
            ),
        })
    }
}

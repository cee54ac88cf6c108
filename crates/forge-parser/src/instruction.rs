//! Instruction-file metadata.
//!
//! The instruction file (any path containing `skill.md`, case-insensitive)
//! carries the package's `name:` and `description:` lines. Only those two
//! keys are read; the rest of the file is free text.

use regex::Regex;
use std::sync::LazyLock;

pub use forge_files::is_instruction_path;

/// Description used when the instruction file has none.
pub const DEFAULT_DESCRIPTION: &str = "Expert Agent Module";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*name:[ \t]*(.*?)[ \t\r]*$").expect("valid regex"));
static DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*description:[ \t]*(.*?)[ \t\r]*$").expect("valid regex")
});

fn first_value<'a>(regex: &Regex, content: &'a str) -> Option<&'a str> {
    regex
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|value| !value.is_empty())
}

/// Extracts the package name from instruction-file content.
///
/// Returns the first `name:` line with a non-empty value.
///
/// # Examples
///
/// ```
/// use forge_parser::instruction::extract_name;
///
/// assert_eq!(extract_name("---\nname: ratio-kit\n---"), Some("ratio-kit"));
/// assert_eq!(extract_name("name:   \nname: second"), Some("second"));
/// assert_eq!(extract_name("no metadata"), None);
/// ```
#[must_use]
pub fn extract_name(content: &str) -> Option<&str> {
    first_value(&NAME_REGEX, content)
}

/// Extracts the description from instruction-file content.
///
/// # Examples
///
/// ```
/// use forge_parser::instruction::extract_description;
///
/// assert_eq!(
///     extract_description("name: x\ndescription: Audits brand colours  "),
///     Some("Audits brand colours")
/// );
/// ```
#[must_use]
pub fn extract_description(content: &str) -> Option<&str> {
    first_value(&DESCRIPTION_REGEX, content)
}

/// Description for a package, falling back to [`DEFAULT_DESCRIPTION`].
#[must_use]
pub fn description_or_default(content: &str) -> &str {
    extract_description(content).unwrap_or(DEFAULT_DESCRIPTION)
}

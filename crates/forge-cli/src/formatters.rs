//! Output formatters for CLI commands.
//!
//! Provides consistent formatting across all CLI commands for JSON, text, and pretty output modes.

use anyhow::Result;
use colored::Colorize;
use forge_core::cli::OutputFormat;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use forge_core::cli::OutputFormat;
/// use serde::Serialize;
/// use skill_forge_cli::formatters::format_output;
///
/// #[derive(Serialize)]
/// struct Saved {
///     name: String,
///     file_count: usize,
/// }
///
/// let saved = Saved {
///     name: "ratio-kit".to_string(),
///     file_count: 3,
/// };
///
/// let output = format_output(&saved, OutputFormat::Json)?;
/// assert!(output.contains("\"name\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// Formats `data` and prints it to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    let formatted = format_output(data, format)?;
    println!("{formatted}");
    Ok(())
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format data as compact JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, json};

    /// Format data as one line of compact JSON, suitable for piping.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Format data as colorized `key: value` lines.
    ///
    /// Nested objects and arrays are indented beneath their key; long
    /// strings such as file contents are shown with their line breaks.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&mut out, &value, 0);
        Ok(out.trim_end().to_string())
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "-".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(a) if a.is_empty() => "[]".dimmed().to_string(),
            Value::Object(o) if o.is_empty() => "{}".dimmed().to_string(),
            Value::Array(_) | Value::Object(_) => String::new(),
        }
    }

    fn is_block(value: &Value) -> bool {
        match value {
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
            Value::String(s) => s.contains('\n'),
            _ => false,
        }
    }

    fn write_value(out: &mut String, value: &Value, indent: usize) {
        let pad = "  ".repeat(indent);
        match value {
            Value::Object(obj) if !obj.is_empty() => {
                for (key, val) in obj {
                    let key = key.blue().bold();
                    if is_block(val) {
                        out.push_str(&format!("{pad}{key}:\n"));
                        write_value(out, val, indent + 1);
                    } else {
                        out.push_str(&format!("{pad}{key}: {}\n", scalar(val)));
                    }
                }
            }
            Value::Array(arr) if !arr.is_empty() => {
                for item in arr {
                    if is_block(item) {
                        out.push_str(&format!("{pad}-\n"));
                        write_value(out, item, indent + 1);
                    } else {
                        out.push_str(&format!("{pad}- {}\n", scalar(item)));
                    }
                }
            }
            Value::String(s) if s.contains('\n') => {
                for line in s.lines() {
                    out.push_str(&format!("{pad}{}\n", line.dimmed()));
                }
            }
            other => out.push_str(&format!("{pad}{}\n", scalar(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        count: i32,
        enabled: bool,
        files: Vec<String>,
    }

    fn data() -> TestData {
        TestData {
            name: "test".to_string(),
            count: 42,
            enabled: true,
            files: vec!["SKILL.md".to_string(), "run.py".to_string()],
        }
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&data()).unwrap();
        assert!(output.contains("\"name\": \"test\""));
        assert!(output.contains("\"count\": 42"));
        assert!(output.contains("\"enabled\": true"));
    }

    #[test]
    fn test_text_format() {
        let output = text::format(&data()).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains("\"name\":\"test\""));
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = pretty::format(&data()).unwrap();
        assert!(output.contains("name: test"));
        assert!(output.contains("count: 42"));
        assert!(output.contains("files:\n  - SKILL.md\n  - run.py"));
    }

    #[test]
    fn test_pretty_multiline_string() {
        colored::control::set_override(false);
        let output = pretty::format(&serde_json::json!({"content": "a\nb"})).unwrap();
        assert_eq!(output, "content:\n  a\n  b");
    }

    #[test]
    fn test_format_output_dispatch() {
        assert!(format_output(&data(), OutputFormat::Json).unwrap().contains('\n'));
        assert!(!format_output(&data(), OutputFormat::Text).unwrap().contains('\n'));
    }
}

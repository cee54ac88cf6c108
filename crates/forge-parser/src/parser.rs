//! Turns scanned blocks into file records.

use crate::instruction::{extract_name, is_instruction_path};
use crate::scanner::{RawBlock, scan};
use forge_core::{Error, Result};
use forge_files::FileRecord;

const FENCE: &str = "```";

/// Files recognised in one piece of text, plus the package name to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBundle {
    /// Records in source order. Paths may repeat.
    pub files: Vec<FileRecord>,
    /// Name from the last instruction file with a `name:` line, otherwise
    /// the fallback passed to the parser.
    pub resolved_name: String,
}

impl ParsedBundle {
    /// Number of recognised files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the bundle holds no files. Bundles returned by
    /// [`parse`] never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Removes one surrounding code fence from a trimmed block body.
///
/// The opening fence is three backticks, an optional language hint, and a
/// line break. The closing fence is a line break followed by three
/// backticks at the very end. Either may be absent. The result is not
/// trimmed again.
///
/// # Examples
///
/// ```
/// use forge_parser::strip_fences;
///
/// assert_eq!(strip_fences("```python\nprint(1)\n```"), "print(1)");
/// assert_eq!(strip_fences("```\n  x  "), "  x  ");
/// assert_eq!(strip_fences("plain"), "plain");
/// assert_eq!(strip_fences("```inline```"), "```inline```");
/// ```
#[must_use]
pub fn strip_fences(body: &str) -> &str {
    let mut content = body;

    if let Some(rest) = content.strip_prefix(FENCE) {
        let hint_len = rest
            .find(|c: char| c.is_whitespace() || c == '`')
            .unwrap_or(rest.len());
        let after_hint = &rest[hint_len..];
        let after_hint = after_hint.strip_prefix('\r').unwrap_or(after_hint);
        if let Some(inner) = after_hint.strip_prefix('\n') {
            content = inner;
        }
    }

    if let Some(inner) = content.strip_suffix(FENCE)
        && let Some(inner) = inner.strip_suffix('\n')
    {
        content = inner.strip_suffix('\r').unwrap_or(inner);
    }

    content
}

fn to_record(block: &RawBlock<'_>) -> FileRecord {
    FileRecord::new(block.path, strip_fences(block.body.trim()))
}

fn resolve_name(files: &[FileRecord], fallback: &str) -> String {
    files
        .iter()
        .rev()
        .filter(|f| is_instruction_path(f.path()))
        .find_map(|f| extract_name(f.content()))
        .unwrap_or(fallback)
        .to_string()
}

/// Parses every `[FILE: path]` block in `text`.
///
/// Returns `None` when no block is recognised; callers treat that as a
/// no-op. Text outside blocks and malformed markers are ignored.
///
/// # Examples
///
/// ```
/// use forge_parser::parse;
///
/// let reply = "Here you go.\n\
///     [FILE: SKILL.md]\nname: ratio-kit\n\
///     [FILE: scripts/ratios.py]\n```python\nprint(1)\n```";
///
/// let bundle = parse(reply, "untitled-project").unwrap();
/// assert_eq!(bundle.resolved_name, "ratio-kit");
/// assert_eq!(bundle.files.len(), 2);
/// assert_eq!(bundle.files[1].content(), "print(1)");
///
/// assert!(parse("no files here", "untitled-project").is_none());
/// ```
#[must_use]
pub fn parse(text: &str, fallback_name: &str) -> Option<ParsedBundle> {
    let scan = scan(text);
    if scan.is_empty() {
        tracing::debug!(malformed = scan.malformed.len(), "no file blocks found");
        return None;
    }

    let files: Vec<FileRecord> = scan.blocks.iter().map(to_record).collect();
    let resolved_name = resolve_name(&files, fallback_name);

    tracing::debug!(
        files = files.len(),
        malformed = scan.malformed.len(),
        name = %resolved_name,
        "parsed file blocks"
    );

    Some(ParsedBundle {
        files,
        resolved_name,
    })
}

/// Parses like [`parse`] but rejects anything the permissive parser
/// would silently admit or skip.
///
/// # Errors
///
/// Returns [`Error::MalformedFileBlock`] for the first block with an empty
/// path or the first marker without a closing `]`, whichever comes first.
///
/// # Examples
///
/// ```
/// use forge_parser::parse_strict;
///
/// assert!(parse_strict("[FILE: a.md]\nok", "x").unwrap().is_some());
/// assert!(parse_strict("[FILE: ]\nno path", "x").unwrap_err().is_malformed_block());
/// ```
pub fn parse_strict(text: &str, fallback_name: &str) -> Result<Option<ParsedBundle>> {
    let scan = scan(text);

    let empty_path = scan
        .blocks
        .iter()
        .find(|b| b.path.is_empty())
        .map(|b| (b.offset, "file block has an empty path"));
    let unterminated = scan.malformed.first().map(|m| (m.offset, m.reason));

    let first = [empty_path, unterminated]
        .into_iter()
        .flatten()
        .min_by_key(|(offset, _)| *offset);

    if let Some((offset, reason)) = first {
        return Err(Error::MalformedFileBlock {
            offset,
            reason: reason.to_string(),
        });
    }

    Ok(parse(text, fallback_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_files::Language;

    #[test]
    fn test_single_block() {
        let bundle = parse("[FILE: a.txt]\nhello", "fallback").unwrap();
        assert_eq!(bundle.files.len(), 1);
        let file = &bundle.files[0];
        assert_eq!(file.name(), "a.txt");
        assert_eq!(file.path(), "a.txt");
        assert_eq!(file.content(), "hello");
        assert_eq!(bundle.resolved_name, "fallback");
    }

    #[test]
    fn test_fenced_python() {
        let bundle = parse("[FILE: x.py]\n```python\nprint(1)\n```", "f").unwrap();
        assert_eq!(bundle.files[0].content(), "print(1)");
        assert_eq!(bundle.files[0].language(), Language::Python);
    }

    #[test]
    fn test_fence_variants() {
        assert_eq!(strip_fences("```\nbody\n```"), "body");
        assert_eq!(strip_fences("```json\r\n{}\r\n```"), "{}");
        assert_eq!(strip_fences("```c++\nint x;"), "int x;");
        assert_eq!(strip_fences("body\n```"), "body");
        assert_eq!(strip_fences("```"), "```");
        assert_eq!(strip_fences("```py print()"), "```py print()");
    }

    #[test]
    fn test_body_trimmed_before_fence_removal() {
        let bundle = parse("[FILE: a.md]   \n\n```md\n  indented\n```\n\n", "f").unwrap();
        assert_eq!(bundle.files[0].content(), "  indented");
    }

    #[test]
    fn test_name_from_instruction_file() {
        let bundle = parse("[FILE: my-skill/Skill.MD]\nname: foo-bar\n", "fallback").unwrap();
        assert_eq!(bundle.resolved_name, "foo-bar");
    }

    #[test]
    fn test_name_ignored_outside_instruction_file() {
        let bundle = parse("[FILE: README.md]\nname: nope", "fallback").unwrap();
        assert_eq!(bundle.resolved_name, "fallback");
    }

    #[test]
    fn test_last_instruction_file_wins() {
        let text = "[FILE: a/SKILL.md]\nname: first\n[FILE: b/SKILL.md]\nname: second\n[FILE: c/SKILL.md]\nno name";
        assert_eq!(parse(text, "f").unwrap().resolved_name, "second");
    }

    #[test]
    fn test_blank_name_keeps_fallback() {
        let bundle = parse("[FILE: SKILL.md]\nname:   \n", "keep-me").unwrap();
        assert_eq!(bundle.resolved_name, "keep-me");
    }

    #[test]
    fn test_empty_path_admitted_permissively() {
        let bundle = parse("[FILE: ]\nbody", "f").unwrap();
        assert_eq!(bundle.files[0].path(), "");
        assert_eq!(bundle.files[0].name(), "");
    }

    #[test]
    fn test_strict_rejects_empty_path() {
        let err = parse_strict("[FILE: a.md]\nx\n[FILE: ]\ny", "f").unwrap_err();
        match err {
            Error::MalformedFileBlock { offset, .. } => assert_eq!(offset, 15),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_reports_earliest_problem() {
        let err = parse_strict("[FILE: open\n[FILE: ]\n", "f").unwrap_err();
        match err {
            Error::MalformedFileBlock { offset, reason } => {
                assert_eq!(offset, 0);
                assert!(reason.contains("closing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_no_blocks_is_none() {
        assert_eq!(parse_strict("nothing", "f").unwrap(), None);
    }
}

//! Accumulating a streamed reply.
//!
//! Chunks are appended as they arrive. A preview re-parses the whole
//! buffer and reports what changed since the previous preview; nothing
//! here touches the draft.

use forge_parser::{BundleDiff, ParsedBundle, contains_file_marker, diff_bundles, parse};

/// A speculative parse of the reply received so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Files recognised so far, if any.
    pub bundle: Option<ParsedBundle>,
    /// Changes since the previous preview.
    pub diff: BundleDiff,
}

/// Growing reply text.
///
/// # Examples
///
/// ```
/// use forge_workbench::ResponseBuffer;
///
/// let mut buffer = ResponseBuffer::new("untitled-project");
/// buffer.push("[FILE: SKILL.md]\nname: ki");
/// let first = buffer.preview();
/// assert_eq!(first.diff.added, vec!["SKILL.md"]);
///
/// buffer.push("t\n[FILE: run.py]\nprint()");
/// let second = buffer.preview();
/// assert_eq!(second.diff.changed, vec!["SKILL.md"]);
/// assert_eq!(second.diff.added, vec!["run.py"]);
/// assert_eq!(second.bundle.unwrap().resolved_name, "kit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseBuffer {
    text: String,
    fallback_name: String,
    last: Option<ParsedBundle>,
}

impl ResponseBuffer {
    /// Creates an empty buffer; `fallback_name` is used for previews.
    #[must_use]
    pub fn new(fallback_name: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            fallback_name: fallback_name.into(),
            last: None,
        }
    }

    /// Appends a chunk.
    ///
    /// Returns `true` when the chunk completes a line containing a file
    /// marker, the point at which a fresh [`preview`](Self::preview) can
    /// report a new file.
    pub fn push(&mut self, chunk: &str) -> bool {
        let start = self.text.len();
        self.text.push_str(chunk);

        let Some(end) = self.text.rfind('\n').filter(|&end| end >= start) else {
            return false;
        };
        let line_start = self.text[..start].rfind('\n').map_or(0, |i| i + 1);
        contains_file_marker(&self.text[line_start..end])
    }

    /// Text received so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if nothing but whitespace has arrived.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Re-parses the buffer and diffs against the previous preview.
    pub fn preview(&mut self) -> Preview {
        let bundle = parse(&self.text, &self.fallback_name);
        let diff = diff_bundles(self.last.as_ref(), bundle.as_ref());
        self.last.clone_from(&bundle);
        Preview { bundle, diff }
    }

    /// Consumes the buffer, returning the complete text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

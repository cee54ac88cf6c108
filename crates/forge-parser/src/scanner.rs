//! Single-pass scanner for file blocks.
//!
//! The scanner walks the input left to right with two states. While
//! seeking, everything up to the next `[FILE:` is ignored. A marker whose
//! closing `]` sits on the same line opens a block; the block's body runs
//! until the next `[FILE:` occurrence or the end of input. A `[FILE:`
//! without a `]` on its line is malformed: it closes any open block and is
//! skipped.
//!
//! Blocks borrow from the input; nothing is cleaned up here.

/// The literal that opens a file block.
pub const FILE_MARKER: &str = "[FILE:";

/// One recognised block, before body cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Byte offset of the block's `[FILE:` marker.
    pub offset: usize,
    /// Marker path, trimmed. May be empty.
    pub path: &'a str,
    /// Everything between the marker's `]` and the next marker.
    pub body: &'a str,
}

/// A `[FILE:` occurrence that could not be read as a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedMarker {
    /// Byte offset of the `[FILE:` occurrence.
    pub offset: usize,
    /// What was wrong with it.
    pub reason: &'static str,
}

/// Scanner output: every block and every malformed marker, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan<'a> {
    /// Recognised blocks.
    pub blocks: Vec<RawBlock<'a>>,
    /// Rejected marker occurrences.
    pub malformed: Vec<MalformedMarker>,
}

impl Scan<'_> {
    /// Returns `true` if no block was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns `true` if every marker occurrence was well formed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum State<'a> {
    SeekingMarker,
    InBody {
        offset: usize,
        path: &'a str,
        body_start: usize,
    },
}

/// Scans `text` for file blocks.
///
/// # Examples
///
/// ```
/// use forge_parser::scan;
///
/// let scan = scan("intro\n[FILE: a.md]\nalpha\n[FILE: broken\n[FILE: b.md] beta");
///
/// assert_eq!(scan.blocks.len(), 2);
/// assert_eq!(scan.blocks[0].path, "a.md");
/// assert_eq!(scan.blocks[0].body, "\nalpha\n");
/// assert_eq!(scan.blocks[1].body, " beta");
/// assert_eq!(scan.malformed.len(), 1);
/// ```
#[must_use]
pub fn scan(text: &str) -> Scan<'_> {
    let mut out = Scan::default();
    let mut state = State::SeekingMarker;
    let mut pos = 0;
    let mut unterminated_until = 0;

    loop {
        let next = text[pos..].find(FILE_MARKER).map(|i| pos + i);

        if let State::InBody {
            offset,
            path,
            body_start,
        } = state
        {
            let end = next.unwrap_or(text.len());
            out.blocks.push(RawBlock {
                offset,
                path,
                body: &text[body_start..end],
            });
            state = State::SeekingMarker;
        }

        let Some(start) = next else {
            break;
        };

        let after = start + FILE_MARKER.len();
        let close = if after < unterminated_until {
            None
        } else {
            match text[after..].find(['\n', ']']).map(|i| after + i) {
                Some(i) if text.as_bytes()[i] == b']' => Some(i),
                found => {
                    // No `]` before the line ends, so later markers on this line fail too.
                    unterminated_until = found.unwrap_or(text.len());
                    None
                }
            }
        };

        if let Some(close) = close {
            state = State::InBody {
                offset: start,
                path: text[after..close].trim(),
                body_start: close + 1,
            };
            pos = close + 1;
        } else {
            tracing::debug!(offset = start, "skipping unterminated file marker");
            out.malformed.push(MalformedMarker {
                offset: start,
                reason: "marker has no closing `]` on its line",
            });
            pos = after;
        }
    }

    out
}

/// Returns `true` if `text` contains at least one `[FILE:` occurrence.
///
/// A cheap pre-check; it does not validate the marker.
#[must_use]
pub fn contains_file_marker(text: &str) -> bool {
    text.contains(FILE_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_empty_input() {
        let scan = scan("");
        assert!(scan.is_empty());
        assert!(scan.is_clean());
    }

    #[test]
    fn test_scan_no_markers() {
        assert!(scan("just prose, no files").is_empty());
    }

    #[test]
    fn test_scan_single_block() {
        let scan = scan("[FILE: a.txt]\nhello");
        assert_eq!(
            scan.blocks,
            vec![RawBlock {
                offset: 0,
                path: "a.txt",
                body: "\nhello",
            }]
        );
    }

    #[test]
    fn test_scan_offsets() {
        let text = "xx[FILE: a]1[FILE: b]2";
        let scan = scan(text);
        assert_eq!(scan.blocks[0].offset, 2);
        assert_eq!(scan.blocks[1].offset, 12);
        assert_eq!(&text[scan.blocks[1].offset..][..6], FILE_MARKER);
    }

    #[test]
    fn test_scan_path_trimmed_and_empty() {
        let scan = scan("[FILE:   spaced.md   ]x[FILE:]y[FILE: ]z");
        let paths: Vec<_> = scan.blocks.iter().map(|b| b.path).collect();
        assert_eq!(paths, vec!["spaced.md", "", ""]);
    }

    #[test]
    fn test_scan_bracket_must_be_on_marker_line() {
        let scan = scan("[FILE: a.md\n]body");
        assert!(scan.is_empty());
        assert_eq!(scan.malformed[0].offset, 0);
    }

    #[test]
    fn test_malformed_marker_closes_open_block() {
        let scan = scan("[FILE: a.md]\nkeep\n[FILE: oops\ndropped text\n[FILE: b.md]\nb");
        assert_eq!(scan.blocks.len(), 2);
        assert_eq!(scan.blocks[0].body, "\nkeep\n");
        assert_eq!(scan.blocks[1].path, "b.md");
        assert_eq!(scan.malformed.len(), 1);
    }

    #[test]
    fn test_marker_at_end_of_input() {
        let scan = scan("[FILE: a.md]");
        assert_eq!(scan.blocks.len(), 1);
        assert_eq!(scan.blocks[0].body, "");

        let scan = super::scan("text [FILE:");
        assert!(scan.is_empty());
        assert_eq!(scan.malformed.len(), 1);
    }

    #[test]
    fn test_path_stops_at_first_bracket() {
        let scan = scan("[FILE: a]b]\nbody");
        assert_eq!(scan.blocks[0].path, "a");
        assert_eq!(scan.blocks[0].body, "b]\nbody");
    }

    #[test]
    fn test_many_unterminated_markers_on_one_line() {
        let text = "[FILE:".repeat(40_000);
        let scan = scan(&text);
        assert!(scan.is_empty());
        assert_eq!(scan.malformed.len(), 40_000);
        assert_eq!(scan.malformed[39_999].offset, 39_999 * FILE_MARKER.len());
    }

    #[test]
    fn test_unterminated_line_does_not_leak_into_next_line() {
        let scan = scan("[FILE: a [FILE: b\n[FILE: c]\nbody");
        assert_eq!(scan.malformed.len(), 2);
        assert_eq!(scan.blocks.len(), 1);
        assert_eq!(scan.blocks[0].path, "c");
    }

    #[test]
    fn test_many_markers_on_one_line() {
        let text = "[FILE: a]x".repeat(1_000);
        let scan = scan(&text);
        assert_eq!(scan.blocks.len(), 1_000);
        assert!(scan.blocks.iter().all(|b| b.path == "a" && b.body == "x"));
    }

    #[test]
    fn test_contains_file_marker() {
        assert!(contains_file_marker("see [FILE: x]"));
        assert!(contains_file_marker("[FILE:"));
        assert!(!contains_file_marker("[file: x]"));
    }
}

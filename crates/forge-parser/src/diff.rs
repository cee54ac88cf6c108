//! Differences between two parses of a growing reply.
//!
//! While a reply streams in, the whole buffer is re-parsed on demand and
//! compared with the previous result. Paths are compared after the
//! later-wins rule, so a path repeated within one bundle counts once.

use crate::parser::ParsedBundle;
use std::collections::HashMap;

/// Paths that appeared, changed or disappeared between two bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleDiff {
    /// Paths present only in the newer bundle, in its order.
    pub added: Vec<String>,
    /// Paths in both bundles whose content differs, in the newer order.
    pub changed: Vec<String>,
    /// Paths present only in the older bundle, in its order.
    pub removed: Vec<String>,
}

impl BundleDiff {
    /// Returns `true` if nothing differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

fn latest_by_path(bundle: Option<&ParsedBundle>) -> (Vec<&str>, HashMap<&str, &str>) {
    let mut order = Vec::new();
    let mut latest = HashMap::new();
    for file in bundle.map(|b| b.files.as_slice()).unwrap_or_default() {
        if latest.insert(file.path(), file.content()).is_none() {
            order.push(file.path());
        }
    }
    (order, latest)
}

/// Compares two parse results. `None` stands for "no files".
///
/// # Examples
///
/// ```
/// use forge_parser::{diff_bundles, parse};
///
/// let before = parse("[FILE: a.md]\none", "x");
/// let after = parse("[FILE: a.md]\none two\n[FILE: b.md]\n", "x");
///
/// let diff = diff_bundles(before.as_ref(), after.as_ref());
/// assert_eq!(diff.added, vec!["b.md"]);
/// assert_eq!(diff.changed, vec!["a.md"]);
/// assert!(diff.removed.is_empty());
/// ```
#[must_use]
pub fn diff_bundles(previous: Option<&ParsedBundle>, next: Option<&ParsedBundle>) -> BundleDiff {
    let (old_order, old) = latest_by_path(previous);
    let (new_order, new) = latest_by_path(next);

    let mut diff = BundleDiff::default();
    for path in new_order {
        match old.get(path) {
            None => diff.added.push(path.to_string()),
            Some(content) if *content != new[path] => diff.changed.push(path.to_string()),
            Some(_) => {}
        }
    }
    diff.removed = old_order
        .into_iter()
        .filter(|path| !new.contains_key(path))
        .map(str::to_string)
        .collect();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_identical_bundles() {
        let a = parse("[FILE: a]\n1", "x");
        assert!(diff_bundles(a.as_ref(), a.as_ref()).is_empty());
    }

    #[test]
    fn test_from_nothing() {
        let a = parse("[FILE: a]\n1[FILE: b]2", "x");
        let diff = diff_bundles(None, a.as_ref());
        assert_eq!(diff.added, vec!["a", "b"]);
    }

    #[test]
    fn test_removed() {
        let a = parse("[FILE: a]\n1[FILE: b]2", "x");
        let b = parse("[FILE: b]2", "x");
        let diff = diff_bundles(a.as_ref(), b.as_ref());
        assert_eq!(diff.removed, vec!["a"]);
        assert!(diff.added.is_empty());
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn test_duplicate_path_uses_last_content() {
        let a = parse("[FILE: a]\nold", "x");
        let b = parse("[FILE: a]\nnew[FILE: a]\nold", "x");
        assert!(diff_bundles(a.as_ref(), b.as_ref()).is_empty());
    }
}

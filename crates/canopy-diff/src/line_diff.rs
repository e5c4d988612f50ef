//! Line-level text diffs.
//!
//! Uses the `similar` crate (Myers diff) in two forms: a unified diff with
//! three lines of context for ad hoc two-file comparison, and a
//! full-coverage form that classifies every line with no elision, used by
//! the heading differ for matched-node bodies. Both are deterministic and
//! treat identical inputs as an empty diff.

use similar::{ChangeTag, TextDiff};

/// A single classified line. The text keeps its original line terminator
/// so a diff can be re-applied losslessly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in both inputs.
    Unchanged(String),
    /// Present only in the new input.
    Added(String),
    /// Present only in the old input.
    Removed(String),
}

impl DiffLine {
    /// The line text without its classification.
    pub fn text(&self) -> &str {
        match self {
            DiffLine::Unchanged(s) | DiffLine::Added(s) | DiffLine::Removed(s) => s,
        }
    }

    /// Render with a two-character tag prefix, without the terminator.
    pub fn render(&self) -> String {
        let (tag, text) = match self {
            DiffLine::Unchanged(s) => ("  ", s),
            DiffLine::Added(s) => ("+ ", s),
            DiffLine::Removed(s) => ("- ", s),
        };
        format!("{tag}{}", text.trim_end_matches(['\n', '\r']))
    }
}

/// Classify every line of `old` → `new`, with no elision.
///
/// Identical inputs yield an empty vector.
pub fn full_diff(old: &str, new: &str) -> Vec<DiffLine> {
    if old == new {
        return Vec::new();
    }
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .map(|change| {
            let text = change.value().to_string();
            match change.tag() {
                ChangeTag::Equal => DiffLine::Unchanged(text),
                ChangeTag::Insert => DiffLine::Added(text),
                ChangeTag::Delete => DiffLine::Removed(text),
            }
        })
        .collect()
}

/// Render a full diff as one tagged-line-per-row text block.
pub fn render_lines(lines: &[DiffLine]) -> String {
    lines
        .iter()
        .map(DiffLine::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Three-lines-of-context unified diff, labeled with the caller's version
/// tags. Returns an empty string for identical inputs.
pub fn unified_diff(old: &str, new: &str, label_old: &str, label_new: &str) -> String {
    if old == new {
        return String::new();
    }
    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(3)
        .header(label_old, label_new)
        .to_string()
}

/// Reconstruct the new text from the old text and a full diff.
///
/// Verifies that every removed or unchanged line matches `old` in order; a
/// mismatch means the diff was not produced from this text.
pub fn apply_patch(old: &str, lines: &[DiffLine]) -> Option<String> {
    if lines.is_empty() {
        return Some(old.to_string());
    }
    let mut old_iter = old.split_inclusive('\n');
    let mut out = String::new();
    for line in lines {
        match line {
            DiffLine::Unchanged(text) => {
                if old_iter.next() != Some(text.as_str()) {
                    return None;
                }
                out.push_str(text);
            }
            DiffLine::Removed(text) => {
                if old_iter.next() != Some(text.as_str()) {
                    return None;
                }
            }
            DiffLine::Added(text) => out.push_str(text),
        }
    }
    if old_iter.next().is_some() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_empty_diff() {
        assert!(full_diff("a\nb\n", "a\nb\n").is_empty());
        assert_eq!(unified_diff("a\nb\n", "a\nb\n", "v1", "v2"), "");
    }

    #[test]
    fn full_diff_covers_every_line() {
        let lines = full_diff("a\nb\nc\n", "a\nX\nc\n");
        // One removal, one addition, and both context lines present.
        assert_eq!(
            lines.iter().filter(|l| matches!(l, DiffLine::Unchanged(_))).count(),
            2
        );
        assert!(lines.contains(&DiffLine::Removed("b\n".into())));
        assert!(lines.contains(&DiffLine::Added("X\n".into())));
    }

    #[test]
    fn full_diff_is_deterministic() {
        let a = "one\ntwo\nthree\n";
        let b = "one\n2\nthree\nfour\n";
        assert_eq!(full_diff(a, b), full_diff(a, b));
    }

    #[test]
    fn unified_diff_carries_labels() {
        let out = unified_diff("a\n", "b\n", "old.txt", "new.txt");
        assert!(out.contains("--- old.txt"));
        assert!(out.contains("+++ new.txt"));
        assert!(out.contains("-a"));
        assert!(out.contains("+b"));
    }

    #[test]
    fn render_tags_lines() {
        assert_eq!(DiffLine::Unchanged("x\n".into()).render(), "  x");
        assert_eq!(DiffLine::Added("y\n".into()).render(), "+ y");
        assert_eq!(DiffLine::Removed("z".into()).render(), "- z");
    }

    #[test]
    fn patch_roundtrip() {
        let old = "alpha\nbeta\ngamma\n";
        let new = "alpha\nBETA\ngamma\ndelta\n";
        let lines = full_diff(old, new);
        assert_eq!(apply_patch(old, &lines).as_deref(), Some(new));
    }

    #[test]
    fn patch_roundtrip_without_trailing_newline() {
        let old = "a\nb";
        let new = "a\nc";
        let lines = full_diff(old, new);
        assert_eq!(apply_patch(old, &lines).as_deref(), Some(new));
    }

    #[test]
    fn patch_of_empty_diff_is_identity() {
        let text = "unchanged\n";
        assert_eq!(apply_patch(text, &[]).as_deref(), Some(text));
    }

    #[test]
    fn patch_rejects_foreign_diff() {
        let lines = full_diff("a\n", "b\n");
        assert_eq!(apply_patch("something else\n", &lines), None);
    }
}

//! Heading-based structural diff.
//!
//! Matches two subtrees by normalized title instead of stable identity.
//! Useful for comparing code organized under conventional headings (e.g.
//! `ClassName.memberName`) across versions whose node ids do not line up,
//! such as two separately loaded copies of a file.

use std::collections::BTreeMap;

use canopy_outline::{Document, Position};
use tracing::warn;

use crate::error::DiffResult;
use crate::line_diff::{full_diff, render_lines};

/// Strip everything up to and including the first `.` in a title, if one
/// exists; otherwise keep the title unchanged. Surrounding whitespace is
/// trimmed either way.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    match trimmed.find('.') {
        Some(i) => trimmed[i + 1..].trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// One emitted comparison result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadingEntry {
    /// The title exists on both sides and the bodies differ. Carries the
    /// rendered full-coverage line diff and both matched positions.
    Matched {
        title: String,
        diff: String,
        a: Position,
        b: Position,
    },
    /// The title exists only in subtree A and its body has content.
    OnlyInA { title: String, pos: Position },
    /// The title exists only in subtree B and its body has content.
    OnlyInB { title: String, pos: Position },
}

/// The result of a heading-based subtree comparison.
#[derive(Clone, Debug, Default)]
pub struct HeadingDiff {
    /// Emitted entries: matched titles in sorted order, then A-only titles
    /// in sorted order, then B-only titles in sorted order.
    pub entries: Vec<HeadingEntry>,
    /// Original titles whose normalized form collided with an earlier node
    /// in the same subtree. Diagnostic only; the scan keeps the later node.
    pub duplicates: Vec<String>,
}

impl HeadingDiff {
    /// Returns `true` if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan the subtree at `root` into a normalized-title → position map.
///
/// Pre-order traversal; on a duplicate normalized title the later node
/// overwrites the earlier one and the original title is reported as a
/// diagnostic. Never fails the scan.
pub fn scan_headings(
    doc: &Document,
    root: &Position,
) -> DiffResult<(BTreeMap<String, Position>, Vec<String>)> {
    let mut map = BTreeMap::new();
    let mut duplicates = Vec::new();
    for pos in doc.walk_subtree(root) {
        let title = doc.title(&pos)?.to_string();
        let normalized = normalize_title(&title);
        if map.insert(normalized, pos).is_some() {
            warn!(doc = doc.name(), title, "duplicate heading in subtree");
            duplicates.push(title);
        }
    }
    Ok((map, duplicates))
}

/// Compare two subtrees by normalized heading.
///
/// Titles from A are visited in lexicographically sorted order (unlike the
/// identity change set, which keeps traversal order): matched titles with
/// differing bodies emit a [`HeadingEntry::Matched`] carrying the line
/// diff; identical bodies emit nothing. One-sided titles emit an entry only
/// when the body is not blank — blank-bodied nodes are organizers with no
/// comparable content. B's titles absent from A follow, also sorted.
pub fn diff_by_heading(
    doc_a: &Document,
    root_a: &Position,
    doc_b: &Document,
    root_b: &Position,
) -> DiffResult<HeadingDiff> {
    let (map_a, mut duplicates) = scan_headings(doc_a, root_a)?;
    let (map_b, duplicates_b) = scan_headings(doc_b, root_b)?;
    duplicates.extend(duplicates_b);

    let mut entries = Vec::new();

    for (title, pos_a) in &map_a {
        match map_b.get(title) {
            Some(pos_b) => {
                let body_a = doc_a.body(pos_a)?;
                let body_b = doc_b.body(pos_b)?;
                let lines = full_diff(body_a, body_b);
                if !lines.is_empty() {
                    entries.push(HeadingEntry::Matched {
                        title: title.clone(),
                        diff: render_lines(&lines),
                        a: pos_a.clone(),
                        b: pos_b.clone(),
                    });
                }
            }
            None => {
                if !doc_a.node(pos_a.id())?.is_organizer() {
                    entries.push(HeadingEntry::OnlyInA {
                        title: title.clone(),
                        pos: pos_a.clone(),
                    });
                }
            }
        }
    }

    for (title, pos_b) in &map_b {
        if !map_a.contains_key(title) && !doc_b.node(pos_b.id())?.is_organizer() {
            entries.push(HeadingEntry::OnlyInB {
                title: title.clone(),
                pos: pos_b.clone(),
            });
        }
    }

    Ok(HeadingDiff {
        entries,
        duplicates,
    })
}

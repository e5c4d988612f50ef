//! End-to-end compare operations.
//!
//! These tie the pieces together: load a secondary document, index both
//! sides, compute a change set, and graft a report into the primary. The
//! secondary document is transient; the caller discards it after use.

use std::path::Path;

use canopy_diff::{
    build_index, diff_by_heading, diff_by_identity, unified_diff, ChangeSet, HeadingDiff,
};
use canopy_outline::{read_file_text, Document, DocumentLoader, Position};
use tracing::info;

use crate::error::{ReportError, ReportResult};
use crate::report::{build_heading_report, build_report, ReportSpec};

/// What a document comparison produced.
#[derive(Debug)]
pub struct CompareOutcome {
    /// The inserted/deleted/changed partition.
    pub change_set: ChangeSet,
    /// Position of the grafted report root in the primary document.
    pub report: Position,
}

/// Compare the primary document against the document stored at `path`.
///
/// The secondary is loaded through `loader` into a transient document; a
/// load failure aborts the whole comparison with no partial report. The
/// report is inserted after the primary's selection (or appended at top
/// level when nothing is selected).
pub fn compare_documents(
    primary: &mut Document,
    loader: &dyn DocumentLoader,
    path: &Path,
) -> ReportResult<CompareOutcome> {
    let secondary = loader.load(path)?;
    info!(
        primary = primary.name(),
        secondary = secondary.name(),
        "comparing documents"
    );

    let index_a = build_index(primary);
    let index_b = build_index(&secondary);
    let change_set = diff_by_identity(primary, &index_a, &secondary, &index_b)?;

    let spec = ReportSpec::new("Compare Two Files", primary.name(), secondary.name())
        .whole_documents();
    let anchor = primary.selection().cloned();
    let report = build_report(primary, &secondary, anchor.as_ref(), &change_set, &spec)?;

    Ok(CompareOutcome { change_set, report })
}

/// Compare two subtrees of the primary document by normalized heading.
///
/// Both anchors live in the primary, so every grafted member is a clone.
/// `tag` titles the report root.
pub fn compare_subtrees(
    primary: &mut Document,
    anchor_a: &Position,
    anchor_b: &Position,
    tag: &str,
) -> ReportResult<(HeadingDiff, Position)> {
    let diff = diff_by_heading(primary, anchor_a, primary, anchor_b)?;
    let spec = ReportSpec::new(tag, "A", "B");
    let anchor = primary.selection().cloned();
    let report = build_heading_report(primary, None, anchor.as_ref(), &diff, &spec)?;
    Ok((diff, report))
}

/// Compare a titled container in the primary against the container with
/// the same title in the document at `path`.
///
/// A missing container on either side is reported as
/// [`ReportError::NoMatchingContainer`]; the caller surfaces it as a
/// notice and no report is produced.
pub fn compare_anchored(
    primary: &mut Document,
    loader: &dyn DocumentLoader,
    path: &Path,
    anchor_title: &str,
    tag: &str,
) -> ReportResult<(HeadingDiff, Position)> {
    let secondary = loader.load(path)?;

    let anchor_a = primary
        .find_by_title(anchor_title)
        .ok_or_else(|| ReportError::NoMatchingContainer {
            title: anchor_title.to_string(),
            document: primary.name().to_string(),
        })?;
    let anchor_b = secondary
        .find_by_title(anchor_title)
        .ok_or_else(|| ReportError::NoMatchingContainer {
            title: anchor_title.to_string(),
            document: secondary.name().to_string(),
        })?;

    let diff = diff_by_heading(primary, &anchor_a, &secondary, &anchor_b)?;
    let spec = ReportSpec::new(tag, primary.name(), secondary.name());
    let insertion = primary.selection().cloned();
    let report =
        build_heading_report(primary, Some(&secondary), insertion.as_ref(), &diff, &spec)?;
    Ok((diff, report))
}

/// Diff two text files and insert the result as a single node.
///
/// The node's body is a three-line-context unified diff labeled with the
/// files' short names; identical files produce a node with an empty body.
pub fn diff_files(
    primary: &mut Document,
    path_a: &Path,
    path_b: &Path,
) -> ReportResult<Position> {
    let text_a = read_file_text(path_a)?;
    let text_b = read_file_text(path_b)?;
    let diff = unified_diff(&text_a, &text_b, &short_name(path_a), &short_name(path_b));

    let anchor = primary.selection().cloned();
    primary.with_transaction("File Diff", |doc| {
        let node = match anchor.as_ref() {
            Some(pos) => doc.insert_after(pos)?,
            None => doc.push_root(Default::default()),
        };
        doc.set_title(&node, "diff")?;
        doc.set_body(&node, diff)?;
        doc.select(&node)?;
        Ok(node)
    })
}

fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_outline::{JsonLoader, Node, OutlineError};

    fn write_doc(dir: &Path, name: &str, doc: &Document) -> std::path::PathBuf {
        let path = dir.join(name);
        JsonLoader::new().save(doc, &path).unwrap();
        path
    }

    #[test]
    fn compare_against_saved_copy_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = Document::new("a.canopy");
        a.push_root(Node::new("Intro", "hello"));
        let path = write_doc(dir.path(), "b.canopy", &a.clone_as("b.canopy"));

        let outcome = compare_documents(&mut a, &JsonLoader::new(), &path).unwrap();
        assert!(outcome.change_set.is_empty());
        // The report root still exists (empty), selected for visibility.
        assert_eq!(a.selection(), Some(&outcome.report));
    }

    #[test]
    fn compare_missing_file_aborts_without_report() {
        let mut a = Document::new("a.canopy");
        a.push_root(Node::new("Intro", "hello"));
        let before = a.node_count();

        let err = compare_documents(
            &mut a,
            &JsonLoader::new(),
            Path::new("/nonexistent/b.canopy"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Outline(OutlineError::NotFound(_))
        ));
        assert_eq!(a.node_count(), before);
    }

    #[test]
    fn compare_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = Document::new("a.canopy");
        a.push_root(Node::new("Intro", "hello"));
        a.push_root(Node::new("Body", "world"));

        let mut b = a.clone_as("b.canopy");
        let body = b.find_by_title("Body").unwrap();
        b.set_body(&body, "WORLD").unwrap();
        b.push_root(Node::new("New", "added"));
        let path = write_doc(dir.path(), "b.canopy", &b);

        let outcome = compare_documents(&mut a, &JsonLoader::new(), &path).unwrap();
        assert_eq!(outcome.change_set.inserted.len(), 1);
        assert!(outcome.change_set.deleted.is_empty());
        assert_eq!(outcome.change_set.changed.len(), 1);

        // The changed group shows B's content.
        let report_node = a.node(outcome.report.id()).unwrap();
        let changed_group = *report_node.children.last().unwrap();
        let member = a.node(changed_group).unwrap().children[0];
        assert_eq!(a.node(member).unwrap().body, "WORLD");
    }

    #[test]
    fn anchored_compare_missing_container_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = Document::new("a.canopy");
        a.push_root(Node::new("Code", "x"));
        let path = write_doc(dir.path(), "b.canopy", &Document::new("b.canopy"));

        let err = compare_anchored(&mut a, &JsonLoader::new(), &path, "Code", "tag").unwrap_err();
        assert!(matches!(
            err,
            ReportError::NoMatchingContainer { ref document, .. } if document == "b.canopy"
        ));
    }

    #[test]
    fn anchored_compare_builds_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = Document::new("a.canopy");
        let code_a = a.push_root(Node::new("Code", ""));
        let f = a.insert_as_last_child(&code_a).unwrap();
        a.set_title(&f, "C.run").unwrap();
        a.set_body(&f, "one\n").unwrap();

        let mut b = Document::new("b.canopy");
        let code_b = b.push_root(Node::new("Code", ""));
        let g = b.insert_as_last_child(&code_b).unwrap();
        b.set_title(&g, "C.run").unwrap();
        b.set_body(&g, "two\n").unwrap();
        let path = write_doc(dir.path(), "b.canopy", &b);

        let (diff, report) =
            compare_anchored(&mut a, &JsonLoader::new(), &path, "Code", "compare code").unwrap();
        assert_eq!(diff.entries.len(), 1);
        assert_eq!(a.title(&report).unwrap(), "compare code");

        // The B side was deep copied into the primary.
        let matched = a.node(report.id()).unwrap().children[0];
        let sides = a.node(matched).unwrap().children.clone();
        assert_eq!(sides.len(), 2);
        assert_eq!(sides[0], f.id());
        assert_ne!(sides[1], g.id());
        assert_eq!(a.node(sides[1]).unwrap().body, "two\n");
    }

    #[test]
    fn subtree_compare_within_document() {
        let mut doc = Document::new("d");
        let a = doc.push_root(Node::new("old", ""));
        let fa = doc.insert_as_last_child(&a).unwrap();
        doc.set_title(&fa, "M.f").unwrap();
        doc.set_body(&fa, "v1\n").unwrap();
        let b = doc.push_root(Node::new("new", ""));
        let fb = doc.insert_as_last_child(&b).unwrap();
        doc.set_title(&fb, "M.f").unwrap();
        doc.set_body(&fb, "v2\n").unwrap();

        let (diff, report) = compare_subtrees(&mut doc, &a, &b, "old vs new").unwrap();
        assert_eq!(diff.entries.len(), 1);

        // Both attached sides are clones of the in-document nodes.
        let matched = doc.node(report.id()).unwrap().children[0];
        assert_eq!(doc.node(matched).unwrap().children, vec![fa.id(), fb.id()]);
    }

    #[test]
    fn diff_files_inserts_single_node() {
        let dir = tempfile::tempdir().unwrap();
        let pa = dir.path().join("a.txt");
        let pb = dir.path().join("b.txt");
        std::fs::write(&pa, "line one\nline two\n").unwrap();
        std::fs::write(&pb, "line one\nline 2\n").unwrap();

        let mut doc = Document::new("d");
        let node = diff_files(&mut doc, &pa, &pb).unwrap();
        assert_eq!(doc.title(&node).unwrap(), "diff");
        let body = doc.body(&node).unwrap();
        assert!(body.contains("--- a.txt"));
        assert!(body.contains("+++ b.txt"));
        assert!(body.contains("-line two"));
        assert!(body.contains("+line 2"));
    }

    #[test]
    fn diff_files_identical_inputs_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let pa = dir.path().join("a.txt");
        let pb = dir.path().join("b.txt");
        std::fs::write(&pa, "same\n").unwrap();
        std::fs::write(&pb, "same\n").unwrap();

        let mut doc = Document::new("d");
        let node = diff_files(&mut doc, &pa, &pb).unwrap();
        assert_eq!(doc.body(&node).unwrap(), "");
    }

    #[test]
    fn diff_files_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pa = dir.path().join("a.txt");
        std::fs::write(&pa, "x\n").unwrap();

        let mut doc = Document::new("d");
        let err = diff_files(&mut doc, &pa, &dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Outline(OutlineError::NotFound(_))
        ));
        assert!(doc.is_empty());
    }
}

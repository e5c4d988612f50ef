//! Materialize diff results as a labeled subtree in a live document.
//!
//! Members already owned by the primary document are attached as clones
//! (shared storage); members owned by the secondary document are deep
//! copied and re-owned. The whole graft runs inside one grouped-undo
//! transaction: it lands completely or not at all.

use canopy_diff::{ChangeSet, HeadingDiff, HeadingEntry};
use canopy_outline::{Document, NodeKind, Position};
use tracing::info;

use crate::error::{ReportError, ReportResult};

/// How a comparison report should be labeled and interpreted.
#[derive(Clone, Debug)]
pub struct ReportSpec {
    /// Title of the report root node (also the undo group name).
    pub title: String,
    /// Label for the A side (usually the primary's short file name).
    pub label_a: String,
    /// Label for the B side.
    pub label_b: String,
    /// `true` when the two inputs are complete documents rather than
    /// arbitrary subtrees. Whole-file container nodes are skipped in that
    /// case: grafting the other document's root wholesale is never useful.
    pub whole_documents: bool,
}

impl ReportSpec {
    pub fn new(
        title: impl Into<String>,
        label_a: impl Into<String>,
        label_b: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            label_a: label_a.into(),
            label_b: label_b.into(),
            whole_documents: false,
        }
    }

    /// Mark this comparison as covering two whole documents.
    pub fn whole_documents(mut self) -> Self {
        self.whole_documents = true;
        self
    }
}

/// Graft an identity change set into `primary` as a report subtree.
///
/// The report root is inserted after `insertion_point` (or appended as a
/// new top-level root when `None`), with up to three labeled groups:
/// deleted ("not in B"), inserted ("not in A"), and changed ("changed: as
/// in B"). Deleted members resolve in `primary` and are attached as clones;
/// inserted and changed members resolve in `secondary` and are deep copied
/// and re-owned. Leaves the selection on the report root.
pub fn build_report(
    primary: &mut Document,
    secondary: &Document,
    insertion_point: Option<&Position>,
    set: &ChangeSet,
    spec: &ReportSpec,
) -> ReportResult<Position> {
    info!(
        report = spec.title,
        members = set.len(),
        "building comparison report"
    );
    primary.with_transaction(&spec.title, |doc| {
        let root = new_report_root(doc, insertion_point, &spec.title)?;

        let groups: [(&_, String, bool); 3] = [
            (&set.deleted, format!("not in {}", spec.label_b), true),
            (&set.inserted, format!("not in {}", spec.label_a), false),
            (&set.changed, format!("changed: as in {}", spec.label_b), false),
        ];
        for (members, group_title, from_primary) in groups {
            if members.is_empty() {
                continue;
            }
            let group = doc.insert_as_last_child(&root)?;
            doc.set_title(&group, group_title)?;
            for (_, pos) in members.iter() {
                attach_member(doc, secondary, &group, pos, from_primary, spec.whole_documents)?;
            }
        }

        doc.select(&root)?;
        doc.expand(&root);
        Ok(root)
    })
}

/// Graft a heading diff into `primary` as a report subtree.
///
/// A-side positions always resolve in `primary` and attach as clones.
/// B-side positions attach as clones when `secondary` is `None` (a
/// within-document comparison) and as re-owned deep copies otherwise.
/// Matched entries become nodes carrying the line diff as their body with
/// both sides attached beneath for traceability.
pub fn build_heading_report(
    primary: &mut Document,
    secondary: Option<&Document>,
    insertion_point: Option<&Position>,
    diff: &HeadingDiff,
    spec: &ReportSpec,
) -> ReportResult<Position> {
    info!(
        report = spec.title,
        entries = diff.entries.len(),
        duplicates = diff.duplicates.len(),
        "building heading report"
    );
    if let Some(prev) = primary.selection().cloned() {
        primary.contract(&prev);
    }
    primary.with_transaction(&spec.title, |doc| {
        let root = new_report_root(doc, insertion_point, &spec.title)?;

        for entry in &diff.entries {
            match entry {
                HeadingEntry::Matched { title, diff, a, b } => {
                    let node = doc.insert_as_last_child(&root)?;
                    doc.set_title(&node, title.clone())?;
                    doc.set_body(&node, diff.clone())?;
                    doc.clone_position(a, &node)?;
                    attach_b_side(doc, secondary, b, &node)?;
                }
                HeadingEntry::OnlyInA { title, pos } => {
                    let node = doc.insert_as_last_child(&root)?;
                    doc.set_title(&node, format!("{title}({} only)", spec.label_a))?;
                    doc.clone_position(pos, &node)?;
                }
                HeadingEntry::OnlyInB { title, pos } => {
                    let node = doc.insert_as_last_child(&root)?;
                    doc.set_title(&node, format!("{title}({} only)", spec.label_b))?;
                    attach_b_side(doc, secondary, pos, &node)?;
                }
            }
        }

        doc.select(&root)?;
        doc.expand(&root);
        Ok(root)
    })
}

fn new_report_root(
    doc: &mut Document,
    insertion_point: Option<&Position>,
    title: &str,
) -> ReportResult<Position> {
    let root = match insertion_point {
        Some(pos) => doc.insert_after(pos)?,
        None => doc.push_root(Default::default()),
    };
    doc.set_title(&root, title)?;
    Ok(root)
}

fn attach_b_side(
    doc: &mut Document,
    secondary: Option<&Document>,
    pos: &Position,
    under: &Position,
) -> ReportResult<()> {
    match secondary {
        None => doc.clone_position(pos, under)?,
        Some(sec) => doc.copy_subtree_from(sec, pos, under)?,
    };
    Ok(())
}

fn attach_member(
    doc: &mut Document,
    secondary: &Document,
    group: &Position,
    pos: &Position,
    from_primary: bool,
    whole_documents: bool,
) -> Result<(), ReportError> {
    let kind = if from_primary {
        doc.node(pos.id())?.kind
    } else {
        secondary.node(pos.id())?.kind
    };
    if whole_documents && kind == NodeKind::FileRoot {
        return Ok(());
    }
    if from_primary {
        doc.clone_position(pos, group)?;
    } else {
        doc.copy_subtree_from(secondary, pos, group)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_diff::{build_index, diff_by_heading, diff_by_identity};
    use canopy_outline::Node;

    fn spec() -> ReportSpec {
        ReportSpec::new("Compare Two Files", "a.canopy", "b.canopy").whole_documents()
    }

    fn scenario() -> (Document, Document) {
        let mut a = Document::new("a.canopy");
        a.push_root(Node::new("Intro", "hello"));
        a.push_root(Node::new("Body", "world"));

        let mut b = a.clone_as("b.canopy");
        let body = b.find_by_title("Body").unwrap();
        b.set_body(&body, "WORLD").unwrap();
        b.push_root(Node::new("New", "added"));
        (a, b)
    }

    fn change_set(a: &Document, b: &Document) -> ChangeSet {
        let ia = build_index(a);
        let ib = build_index(b);
        diff_by_identity(a, &ia, b, &ib).unwrap()
    }

    fn child_titles(doc: &Document, pos: &Position) -> Vec<String> {
        doc.node(pos.id())
            .unwrap()
            .children
            .iter()
            .map(|&c| doc.node(c).unwrap().title.clone())
            .collect()
    }

    #[test]
    fn report_has_expected_groups() {
        let (mut a, b) = scenario();
        let set = change_set(&a, &b);
        let root = build_report(&mut a, &b, None, &set, &spec()).unwrap();

        assert_eq!(a.title(&root).unwrap(), "Compare Two Files");
        let groups = child_titles(&a, &root);
        assert_eq!(groups, ["not in a.canopy", "changed: as in b.canopy"]);
    }

    #[test]
    fn secondary_members_are_copied_and_reowned() {
        let (mut a, b) = scenario();
        let set = change_set(&a, &b);
        let before = b.node_count();
        let root = build_report(&mut a, &b, None, &set, &spec()).unwrap();

        // The "New" node was copied into the primary with a fresh id.
        let inserted_group = Position::child_of(&root, a.node(root.id()).unwrap().children[0]);
        let copies = &a.node(inserted_group.id()).unwrap().children;
        assert_eq!(copies.len(), 1);
        let copy_id = copies[0];
        assert_eq!(a.node(copy_id).unwrap().title, "New");
        assert!(!b.contains(copy_id));

        // Editing the copy leaves the secondary untouched.
        let copy_pos = Position::child_of(&inserted_group, copy_id);
        a.set_body(&copy_pos, "edited").unwrap();
        let b_new = b.find_by_title("New").unwrap();
        assert_eq!(b.body(&b_new).unwrap(), "added");
        assert_eq!(b.node_count(), before);
    }

    #[test]
    fn primary_members_are_cloned() {
        let (mut a, mut b) = scenario();
        // Make a deleted entry: detach "Intro" in b. The identity index
        // only sees mounted nodes, so the id drops out of b's side.
        let intro_b = b.find_by_title("Intro").unwrap();
        b.remove_subtree(&intro_b).unwrap();

        let set = change_set(&a, &b);
        assert_eq!(set.deleted.len(), 1);
        let root = build_report(&mut a, &b, None, &set, &spec()).unwrap();

        // First group is "not in b.canopy" holding a clone of primary's Intro.
        let group_id = a.node(root.id()).unwrap().children[0];
        let clone_id = a.node(group_id).unwrap().children[0];
        let intro_a = a.find_by_title("Intro").unwrap();
        assert_eq!(clone_id, intro_a.id());

        // Editing through the clone reaches the original.
        let group_pos = Position::child_of(&root, group_id);
        let clone_pos = Position::child_of(&group_pos, clone_id);
        a.set_body(&clone_pos, "via clone").unwrap();
        assert_eq!(a.body(&intro_a).unwrap(), "via clone");
    }

    #[test]
    fn whole_document_roots_are_skipped() {
        let mut a = Document::new("a");
        a.push_root(Node::new("anchor", ""));
        let mut b = Document::new("b");
        let file = b.push_root(Node::file_root("wrapped.rs"));
        let child = b.insert_as_last_child(&file).unwrap();
        b.set_title(&child, "content").unwrap();
        b.set_body(&child, "text").unwrap();

        let set = change_set(&a, &b);
        assert_eq!(set.inserted.len(), 2);

        let root = build_report(&mut a, &b, None, &set, &spec()).unwrap();
        let group_id = a.node(root.id()).unwrap().children[1];
        // Only the content node was grafted; the file container was skipped.
        let titles: Vec<String> = a
            .node(group_id)
            .unwrap()
            .children
            .iter()
            .map(|&c| a.node(c).unwrap().title.clone())
            .collect();
        assert_eq!(titles, ["content"]);
    }

    #[test]
    fn subtree_spec_keeps_file_roots() {
        let mut a = Document::new("a");
        a.push_root(Node::new("anchor", ""));
        let mut b = Document::new("b");
        let file = b.push_root(Node::file_root("wrapped.rs"));
        b.set_body(&file, "x").unwrap();

        let set = change_set(&a, &b);
        let spec = ReportSpec::new("t", "a", "b");
        let root = build_report(&mut a, &b, None, &set, &spec).unwrap();
        // Groups: deleted ("anchor"), then inserted holding the file node —
        // not skipped, because this is a subtree comparison.
        let group_id = a.node(root.id()).unwrap().children[1];
        let kept = a.node(group_id).unwrap().children.clone();
        assert_eq!(kept.len(), 1);
        assert_eq!(a.node(kept[0]).unwrap().title, "wrapped.rs");
    }

    #[test]
    fn report_is_one_undo_unit() {
        let (mut a, b) = scenario();
        let set = change_set(&a, &b);
        let count_before = a.node_count();
        let roots_before = a.roots().len();

        build_report(&mut a, &b, None, &set, &spec()).unwrap();
        assert!(a.roots().len() > roots_before);

        a.undo().unwrap();
        assert_eq!(a.roots().len(), roots_before);
        assert_eq!(a.node_count(), count_before);
    }

    #[test]
    fn selection_lands_on_report_root() {
        let (mut a, b) = scenario();
        let set = change_set(&a, &b);
        let root = build_report(&mut a, &b, None, &set, &spec()).unwrap();
        assert_eq!(a.selection(), Some(&root));
        assert!(a.is_expanded(root.id()));
    }

    #[test]
    fn heading_report_materializes_entries() {
        let mut doc = Document::new("d");
        let root_a = doc.push_root(Node::new("A", ""));
        let fa = doc.insert_as_last_child(&root_a).unwrap();
        doc.set_title(&fa, "C.run").unwrap();
        doc.set_body(&fa, "one\n").unwrap();

        let root_b = doc.push_root(Node::new("B", ""));
        let fb = doc.insert_as_last_child(&root_b).unwrap();
        doc.set_title(&fb, "C.run").unwrap();
        doc.set_body(&fb, "two\n").unwrap();
        let only = doc.insert_as_last_child(&root_b).unwrap();
        doc.set_title(&only, "C.extra").unwrap();
        doc.set_body(&only, "content").unwrap();

        let diff = diff_by_heading(&doc, &root_a, &doc, &root_b).unwrap();
        let spec = ReportSpec::new("compare-marked-nodes", "A", "B");
        let report = build_heading_report(&mut doc, None, None, &diff, &spec).unwrap();

        let titles = child_titles(&doc, &report);
        assert_eq!(titles, ["run", "extra(B only)"]);

        // The matched node's body is the rendered line diff, and both sides
        // hang beneath it as clones.
        let matched_id = doc.node(report.id()).unwrap().children[0];
        let matched = doc.node(matched_id).unwrap();
        assert!(matched.body.contains("- one"));
        assert!(matched.body.contains("+ two"));
        assert_eq!(matched.children, vec![fa.id(), fb.id()]);
    }
}

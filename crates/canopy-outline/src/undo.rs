//! Grouped undo log.
//!
//! Every document mutation records its inverse as an [`UndoOp`]. Ops are
//! collected into named groups; one `undo` or `redo` applies a whole group
//! as a unit. The report builder opens one group around an entire report
//! build so the graft is atomic: it either lands completely or is rolled
//! back completely.

use canopy_types::NodeId;

use crate::node::Node;

/// A single invertible step.
///
/// Applying an op mutates the document and yields the op that reverses it,
/// so one representation serves undo, redo, and failure rollback.
#[derive(Clone, Debug)]
pub enum UndoOp {
    /// Remove an arena entry (reverses a node creation).
    DropNode { id: NodeId },
    /// Re-insert an arena entry (reverses `DropNode`).
    RestoreNode { id: NodeId, node: Box<Node> },
    /// Remove the child at `index` of `parent` (reverses an attach).
    /// `parent: None` addresses the document's root list.
    Detach { parent: Option<NodeId>, index: usize },
    /// Insert `id` at `index` under `parent` (reverses `Detach`).
    Attach {
        parent: Option<NodeId>,
        index: usize,
        id: NodeId,
    },
    /// Restore a node's title.
    SetTitle { id: NodeId, title: String },
    /// Restore a node's body.
    SetBody { id: NodeId, body: String },
}

/// A named batch of ops recorded by one logical operation.
#[derive(Clone, Debug)]
pub struct UndoGroup {
    pub name: String,
    pub ops: Vec<UndoOp>,
}

impl UndoGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ops: Vec::new(),
        }
    }
}

/// The document's undo/redo state.
///
/// While a group is open, recorded ops accumulate into it; otherwise each
/// mutation method opens and commits an implicit single-operation group.
#[derive(Debug, Default)]
pub struct UndoLog {
    undo_stack: Vec<UndoGroup>,
    redo_stack: Vec<UndoGroup>,
    open: Option<UndoGroup>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a group is currently open.
    pub fn in_group(&self) -> bool {
        self.open.is_some()
    }

    /// Open a named group. Recording before `commit` lands in this group.
    pub fn begin(&mut self, name: &str) {
        debug_assert!(self.open.is_none(), "undo group already open");
        self.open = Some(UndoGroup::new(name));
    }

    /// Close the open group and push it onto the undo stack.
    ///
    /// Empty groups are discarded; any new edit invalidates the redo stack.
    pub fn commit(&mut self) {
        if let Some(group) = self.open.take() {
            if !group.ops.is_empty() {
                self.redo_stack.clear();
                self.undo_stack.push(group);
            }
        }
    }

    /// Close the open group and hand its ops back without recording them.
    /// Used to roll back a failed operation.
    pub fn abort(&mut self) -> Option<UndoGroup> {
        self.open.take()
    }

    /// Record the inverse of a mutation that was just applied.
    pub fn record(&mut self, op: UndoOp) {
        match &mut self.open {
            Some(group) => group.ops.push(op),
            None => {
                // No explicit group: single-op group.
                self.redo_stack.clear();
                self.undo_stack.push(UndoGroup {
                    name: String::new(),
                    ops: vec![op],
                });
            }
        }
    }

    pub fn pop_undo(&mut self) -> Option<UndoGroup> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<UndoGroup> {
        self.redo_stack.pop()
    }

    pub fn push_undo(&mut self, group: UndoGroup) {
        self.undo_stack.push(group);
    }

    pub fn push_redo(&mut self, group: UndoGroup) {
        self.redo_stack.push(group);
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}

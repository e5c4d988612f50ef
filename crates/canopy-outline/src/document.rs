//! The arena-backed outline document and its mutation API.
//!
//! All node storage lives in one arena keyed by [`NodeId`]. Tree shape is
//! the `roots` list plus each node's `children` list; mounting one id in two
//! places is the clone relationship. Every mutation records its inverse into
//! the document's [`UndoLog`], so callers get grouped, atomic undo for free.

use std::collections::{HashMap, HashSet};

use canopy_types::NodeId;
use tracing::warn;

use crate::error::{OutlineError, OutlineResult};
use crate::node::Node;
use crate::position::Position;
use crate::undo::{UndoGroup, UndoLog, UndoOp};

/// An ordered forest of nodes with a single owner for their storage.
pub struct Document {
    name: String,
    arena: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    selection: Option<Position>,
    expanded: HashSet<NodeId>,
    undo: UndoLog,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("nodes", &self.arena.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arena: HashMap::new(),
            roots: Vec::new(),
            selection: None,
            expanded: HashSet::new(),
            undo: UndoLog::new(),
        }
    }

    pub(crate) fn from_parts(
        name: String,
        arena: HashMap<NodeId, Node>,
        roots: Vec<NodeId>,
    ) -> Self {
        Self {
            name,
            arena,
            roots,
            selection: None,
            expanded: HashSet::new(),
            undo: UndoLog::new(),
        }
    }

    /// The document's display name (usually the short file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Duplicate this document under a new name, preserving every node id.
    ///
    /// This is what a save/reload cycle produces: the same logical nodes in
    /// an independent arena. Selection, expansion, and undo history are not
    /// carried over.
    pub fn clone_as(&self, name: impl Into<String>) -> Document {
        Document::from_parts(name.into(), self.arena.clone(), self.roots.clone())
    }

    /// Top-level node ids in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena (clones count once).
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is stored in this document's arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(&id)
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> OutlineResult<&Node> {
        self.arena.get(&id).ok_or(OutlineError::InvalidPosition(id))
    }

    /// All arena entries, in no particular order. Use [`Document::walk`]
    /// for tree order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.arena.iter().map(|(id, n)| (*id, n))
    }

    /// The node's title at a position.
    pub fn title(&self, pos: &Position) -> OutlineResult<&str> {
        Ok(&self.node(pos.id())?.title)
    }

    /// The node's body at a position.
    pub fn body(&self, pos: &Position) -> OutlineResult<&str> {
        Ok(&self.node(pos.id())?.body)
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    /// Pre-order, depth-first, children-in-order walk over the whole
    /// document. Each clone mount is visited at its own position.
    pub fn walk(&self) -> Walk<'_> {
        let stack = self.roots.iter().rev().map(|&id| Position::root(id)).collect();
        Walk { doc: self, stack }
    }

    /// Pre-order walk of the subtree rooted at `pos` (including `pos`).
    pub fn walk_subtree(&self, pos: &Position) -> Walk<'_> {
        Walk {
            doc: self,
            stack: vec![pos.clone()],
        }
    }

    /// Find the first position (in tree order) whose title matches exactly.
    pub fn find_by_title(&self, title: &str) -> Option<Position> {
        self.walk().find(|p| {
            self.arena
                .get(&p.id())
                .is_some_and(|n| n.title == title)
        })
    }

    /// All ids reachable from `id`, including `id` itself.
    fn subtree_ids(&self, id: NodeId) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if !seen.insert(cur) {
                continue;
            }
            if let Some(node) = self.arena.get(&cur) {
                stack.extend(node.children.iter().copied());
            }
        }
        seen
    }

    // ---------------------------------------------------------------
    // Selection and expansion
    // ---------------------------------------------------------------

    /// Move the selection to `pos`.
    pub fn select(&mut self, pos: &Position) -> OutlineResult<()> {
        self.node(pos.id())?;
        self.selection = Some(pos.clone());
        Ok(())
    }

    /// The currently selected position, if any.
    pub fn selection(&self) -> Option<&Position> {
        self.selection.as_ref()
    }

    /// Mark a node expanded for display.
    pub fn expand(&mut self, pos: &Position) {
        self.expanded.insert(pos.id());
    }

    /// Collapse a node.
    pub fn contract(&mut self, pos: &Position) {
        self.expanded.remove(&pos.id());
    }

    /// Returns `true` if the node is marked expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    // ---------------------------------------------------------------
    // Mutation API
    // ---------------------------------------------------------------

    /// Append a node as a new top-level root. Returns its position.
    pub fn push_root(&mut self, node: Node) -> Position {
        self.grouped_infallible("insert root", |doc| {
            let id = doc.register_node(node);
            doc.record_attach(None, doc.roots.len(), id);
            Position::root(id)
        })
    }

    /// Insert a fresh empty node as the next sibling of `pos`.
    pub fn insert_after(&mut self, pos: &Position) -> OutlineResult<Position> {
        self.node(pos.id())?;
        let parent = pos.parent_id();
        let index = self.sibling_index(pos)?;
        Ok(self.grouped_infallible("insert node", |doc| {
            let id = doc.register_node(Node::default());
            doc.record_attach(parent, index + 1, id);
            Position::at(id, pos.path().to_vec())
        }))
    }

    /// Insert a fresh empty node as the last child of `pos`.
    pub fn insert_as_last_child(&mut self, pos: &Position) -> OutlineResult<Position> {
        let end = self.node(pos.id())?.children.len();
        Ok(self.grouped_infallible("insert child", |doc| {
            let id = doc.register_node(Node::default());
            doc.record_attach(Some(pos.id()), end, id);
            Position::child_of(pos, id)
        }))
    }

    /// Set the node's title. Visible through every clone of the node.
    pub fn set_title(&mut self, pos: &Position, title: impl Into<String>) -> OutlineResult<()> {
        let id = pos.id();
        let node = self.arena.get_mut(&id).ok_or(OutlineError::InvalidPosition(id))?;
        let old = std::mem::replace(&mut node.title, title.into());
        self.undo.record(UndoOp::SetTitle { id, title: old });
        Ok(())
    }

    /// Set the node's body. Visible through every clone of the node.
    pub fn set_body(&mut self, pos: &Position, body: impl Into<String>) -> OutlineResult<()> {
        let id = pos.id();
        let node = self.arena.get_mut(&id).ok_or(OutlineError::InvalidPosition(id))?;
        let old = std::mem::replace(&mut node.body, body.into());
        self.undo.record(UndoOp::SetBody { id, body: old });
        Ok(())
    }

    /// Mount the node at `pos` as the last child of `under`.
    ///
    /// This is the clone operation: no storage is duplicated, and edits made
    /// through either position are visible through both. Mounting a node
    /// inside its own subtree is rejected.
    pub fn clone_position(&mut self, pos: &Position, under: &Position) -> OutlineResult<Position> {
        self.node(pos.id())?;
        let end = self.node(under.id())?.children.len();
        if self.subtree_ids(pos.id()).contains(&under.id()) {
            return Err(OutlineError::WouldCycle(pos.id()));
        }
        Ok(self.grouped_infallible("clone node", |doc| {
            doc.record_attach(Some(under.id()), end, pos.id());
            Position::child_of(under, pos.id())
        }))
    }

    /// Deep-copy the subtree at `pos` in `src` to the last child slot of
    /// `under` in this document.
    ///
    /// Every copied node gets a fresh id in this document's arena, with no
    /// residual reference to `src`; later edits on either side do not
    /// propagate. `src` is left untouched.
    pub fn copy_subtree_from(
        &mut self,
        src: &Document,
        pos: &Position,
        under: &Position,
    ) -> OutlineResult<Position> {
        src.node(pos.id())?;
        let end = self.node(under.id())?.children.len();
        let implicit = !self.undo.in_group();
        if implicit {
            self.undo.begin("copy subtree");
        }
        let result = self.copy_rec(src, pos.id()).map(|id| {
            self.record_attach(Some(under.id()), end, id);
            Position::child_of(under, id)
        });
        if implicit {
            match &result {
                Ok(_) => self.undo.commit(),
                Err(_) => {
                    if let Some(group) = self.undo.abort() {
                        self.rollback(group);
                    }
                }
            }
        }
        result
    }

    fn copy_rec(&mut self, src: &Document, id: NodeId) -> OutlineResult<NodeId> {
        let node = src.node(id)?;
        let mut copy = Node {
            title: node.title.clone(),
            body: node.body.clone(),
            kind: node.kind,
            children: Vec::new(),
        };
        let child_ids = node.children.clone();
        for child in child_ids {
            let new_child = self.copy_rec(src, child)?;
            copy.children.push(new_child);
        }
        Ok(self.register_node(copy))
    }

    /// Detach the mount at `pos`. The arena entry survives if other clones
    /// still mount it; an orphaned entry is kept for undo and reclaimed when
    /// the document is dropped.
    pub fn remove_subtree(&mut self, pos: &Position) -> OutlineResult<()> {
        let parent = pos.parent_id();
        let index = self.sibling_index(pos)?;
        self.grouped_infallible("remove node", |doc| {
            doc.record_detach(parent, index);
        });
        Ok(())
    }

    // ---------------------------------------------------------------
    // Undo
    // ---------------------------------------------------------------

    /// Run `f` inside one named undo group.
    ///
    /// Everything `f` records undoes as a single unit. If `f` fails, every
    /// mutation it already applied is rolled back before the error is
    /// returned, so a failed operation leaves no partial edit behind.
    pub fn with_transaction<T, E>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<OutlineError>,
    {
        self.undo.begin(name);
        match f(self) {
            Ok(value) => {
                self.undo.commit();
                Ok(value)
            }
            Err(e) => {
                if let Some(group) = self.undo.abort() {
                    self.rollback(group);
                }
                Err(e)
            }
        }
    }

    /// Undo the most recent operation or transaction group.
    pub fn undo(&mut self) -> OutlineResult<()> {
        let group = self.undo.pop_undo().ok_or(OutlineError::NothingToUndo)?;
        let inverse = self.apply_group(group);
        self.undo.push_redo(inverse);
        Ok(())
    }

    /// Redo the most recently undone group.
    pub fn redo(&mut self) -> OutlineResult<()> {
        let group = self.undo.pop_redo().ok_or(OutlineError::NothingToRedo)?;
        let inverse = self.apply_group(group);
        self.undo.push_undo(inverse);
        Ok(())
    }

    /// Number of undoable groups.
    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    /// Apply a group's ops newest-first, collecting the inverse group.
    fn apply_group(&mut self, group: UndoGroup) -> UndoGroup {
        let mut inverse_ops = Vec::with_capacity(group.ops.len());
        for op in group.ops.into_iter().rev() {
            match self.apply_op(op) {
                Ok(inv) => inverse_ops.push(inv),
                Err(e) => warn!(error = %e, "skipping inconsistent undo op"),
            }
        }
        UndoGroup {
            name: group.name,
            ops: inverse_ops,
        }
    }

    /// Discard a failed group by applying its ops newest-first.
    fn rollback(&mut self, group: UndoGroup) {
        for op in group.ops.into_iter().rev() {
            if let Err(e) = self.apply_op(op) {
                warn!(error = %e, "skipping inconsistent rollback op");
            }
        }
    }

    /// Apply one op directly (without recording) and return its inverse.
    fn apply_op(&mut self, op: UndoOp) -> OutlineResult<UndoOp> {
        match op {
            UndoOp::DropNode { id } => {
                let node = self
                    .arena
                    .remove(&id)
                    .ok_or(OutlineError::InvalidPosition(id))?;
                Ok(UndoOp::RestoreNode {
                    id,
                    node: Box::new(node),
                })
            }
            UndoOp::RestoreNode { id, node } => {
                self.arena.insert(id, *node);
                Ok(UndoOp::DropNode { id })
            }
            UndoOp::Detach { parent, index } => {
                let id = match parent {
                    None => {
                        if index >= self.roots.len() {
                            return Err(OutlineError::InvalidPosition(NodeId::nil()));
                        }
                        self.roots.remove(index)
                    }
                    Some(p) => {
                        let children = &mut self
                            .arena
                            .get_mut(&p)
                            .ok_or(OutlineError::InvalidPosition(p))?
                            .children;
                        if index >= children.len() {
                            return Err(OutlineError::InvalidPosition(p));
                        }
                        children.remove(index)
                    }
                };
                Ok(UndoOp::Attach { parent, index, id })
            }
            UndoOp::Attach { parent, index, id } => {
                match parent {
                    None => {
                        let at = index.min(self.roots.len());
                        self.roots.insert(at, id);
                    }
                    Some(p) => {
                        let children = &mut self
                            .arena
                            .get_mut(&p)
                            .ok_or(OutlineError::InvalidPosition(p))?
                            .children;
                        let at = index.min(children.len());
                        children.insert(at, id);
                    }
                }
                Ok(UndoOp::Detach { parent, index })
            }
            UndoOp::SetTitle { id, title } => {
                let node = self
                    .arena
                    .get_mut(&id)
                    .ok_or(OutlineError::InvalidPosition(id))?;
                let old = std::mem::replace(&mut node.title, title);
                Ok(UndoOp::SetTitle { id, title: old })
            }
            UndoOp::SetBody { id, body } => {
                let node = self
                    .arena
                    .get_mut(&id)
                    .ok_or(OutlineError::InvalidPosition(id))?;
                let old = std::mem::replace(&mut node.body, body);
                Ok(UndoOp::SetBody { id, body: old })
            }
        }
    }

    // ---------------------------------------------------------------
    // Recording primitives
    // ---------------------------------------------------------------

    fn register_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::mint();
        self.arena.insert(id, node);
        self.undo.record(UndoOp::DropNode { id });
        id
    }

    fn record_attach(&mut self, parent: Option<NodeId>, index: usize, id: NodeId) {
        match parent {
            None => self.roots.insert(index, id),
            Some(p) => {
                // Parent existence is validated by every public caller.
                if let Some(node) = self.arena.get_mut(&p) {
                    node.children.insert(index, id);
                }
            }
        }
        self.undo.record(UndoOp::Detach { parent, index });
    }

    fn record_detach(&mut self, parent: Option<NodeId>, index: usize) {
        let id = match parent {
            None => self.roots.remove(index),
            Some(p) => match self.arena.get_mut(&p) {
                Some(node) => node.children.remove(index),
                None => return,
            },
        };
        self.undo.record(UndoOp::Attach { parent, index, id });
    }

    /// Run infallible mutations inside an implicit group unless the caller
    /// already opened a transaction.
    fn grouped_infallible<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        let implicit = !self.undo.in_group();
        if implicit {
            self.undo.begin(name);
        }
        let value = f(self);
        if implicit {
            self.undo.commit();
        }
        value
    }

    /// Index of `pos` within its sibling list.
    fn sibling_index(&self, pos: &Position) -> OutlineResult<usize> {
        let siblings = match pos.parent_id() {
            None => &self.roots,
            Some(p) => &self.node(p)?.children,
        };
        siblings
            .iter()
            .position(|&c| c == pos.id())
            .ok_or(OutlineError::InvalidPosition(pos.id()))
    }
}

/// Pre-order, depth-first iterator over positions.
pub struct Walk<'a> {
    doc: &'a Document,
    stack: Vec<Position>,
}

impl Iterator for Walk<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let pos = self.stack.pop()?;
        if let Some(node) = self.doc.arena.get(&pos.id()) {
            for &child in node.children.iter().rev() {
                self.stack.push(Position::child_of(&pos, child));
            }
        }
        Some(pos)
    }
}

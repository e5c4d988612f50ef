use canopy_types::NodeId;
use serde::{Deserialize, Serialize};

/// A node at a specific location in a document tree.
///
/// A position pairs the node's id with the root-to-parent path of ids that
/// locates this particular mount. Two positions with the same id but
/// different paths denote the same node seen through different clones;
/// editing through either is visible through both.
///
/// Positions are lightweight cursors. They are invalidated by structural
/// edits to the document and must not be held across them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    id: NodeId,
    path: Vec<NodeId>,
}

impl Position {
    /// Position of a top-level root node.
    pub fn root(id: NodeId) -> Self {
        Self { id, path: Vec::new() }
    }

    /// Position of `id` reached through the given ancestor path.
    pub fn at(id: NodeId, path: Vec<NodeId>) -> Self {
        Self { id, path }
    }

    /// Position of a child of `parent`.
    pub fn child_of(parent: &Position, id: NodeId) -> Self {
        let mut path = parent.path.clone();
        path.push(parent.id);
        Self { id, path }
    }

    /// The node this position refers to.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Ancestor ids from the root down to the immediate parent.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// The immediate parent id, or `None` for a top-level position.
    pub fn parent_id(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// Depth below the root level (roots are depth 0).
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` if both positions denote the same node, regardless of
    /// where it is mounted. This is the clone test.
    pub fn same_node(&self, other: &Position) -> bool {
        self.id == other.id
    }
}

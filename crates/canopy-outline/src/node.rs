use canopy_types::NodeId;
use serde::{Deserialize, Serialize};

/// What a node represents structurally.
///
/// The report builder special-cases whole-file container nodes when two
/// complete documents are being compared; the kind is an explicit tag so no
/// runtime type inspection is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Ordinary content node.
    #[default]
    Content,
    /// Container standing for a whole external file.
    FileRoot,
}

/// A single outline node: a title, a text body, and ordered children.
///
/// Children are referenced by id. The same child id mounted under two
/// parents is a clone relationship; both mounts share this one entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

impl Node {
    /// Create a content node with the given title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: NodeKind::Content,
            children: Vec::new(),
        }
    }

    /// Create a whole-file container node.
    pub fn file_root(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            kind: NodeKind::FileRoot,
            children: Vec::new(),
        }
    }

    /// Returns `true` if the body carries no comparable content.
    ///
    /// Blank-bodied nodes are organizers: purely structural containers that
    /// one-sided heading diffs skip.
    pub fn is_organizer(&self) -> bool {
        self.body.trim().is_empty()
    }
}

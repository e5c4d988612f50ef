//! Identity index: flatten a document into an id → position mapping.

use canopy_outline::{Document, Position};
use canopy_types::NodeId;
use indexmap::IndexMap;
use tracing::debug;

/// Mapping from stable node identity to the node's position, in the
/// traversal order the index was built in.
///
/// Iteration preserves insertion order; the identity change-set computer
/// relies on this for reproducible report layout.
#[derive(Clone, Debug, Default)]
pub struct IdentityIndex {
    map: IndexMap<NodeId, Position>,
}

impl IdentityIndex {
    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no nodes were indexed.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The recorded position for an id.
    pub fn get(&self, id: NodeId) -> Option<&Position> {
        self.map.get(&id)
    }

    /// Returns `true` if the id was indexed.
    pub fn contains(&self, id: NodeId) -> bool {
        self.map.contains_key(&id)
    }

    /// Entries in insertion (traversal) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Position)> {
        self.map.iter().map(|(id, pos)| (*id, pos))
    }
}

/// Build the identity index of a document in one pre-order traversal.
///
/// A clone mounts the same id at several positions; the last position seen
/// in traversal order wins. The document is not modified. An empty document
/// yields an empty index.
pub fn build_index(doc: &Document) -> IdentityIndex {
    let mut map = IndexMap::new();
    for pos in doc.walk() {
        map.insert(pos.id(), pos);
    }
    debug!(doc = doc.name(), ids = map.len(), "built identity index");
    IdentityIndex { map }
}

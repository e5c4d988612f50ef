//! Identity-based change set: partition two indexed documents into
//! inserted, deleted, and changed nodes.

use canopy_outline::{Document, Position};
use canopy_types::NodeId;
use indexmap::IndexMap;
use tracing::debug;

use crate::error::DiffResult;
use crate::index::IdentityIndex;

/// The `{inserted, deleted, changed}` partition of two documents' ids.
///
/// Group iteration follows the order of the underlying identity index
/// (document traversal order), not sorted order. This differs from the
/// heading differ on purpose and keeps report layout reproducible.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    /// Ids present only in document B, with their B-side positions.
    pub inserted: IndexMap<NodeId, Position>,
    /// Ids present only in document A, with their A-side positions.
    pub deleted: IndexMap<NodeId, Position>,
    /// Ids present in both whose title or body differs. The B-side position
    /// is kept so reports show the content of the file being compared in.
    pub changed: IndexMap<NodeId, Position>,
}

impl ChangeSet {
    /// Returns `true` if the two documents are identical by identity.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.changed.is_empty()
    }

    /// Total number of differing nodes.
    pub fn len(&self) -> usize {
        self.inserted.len() + self.deleted.len() + self.changed.len()
    }
}

/// Partition the ids of two indexed documents.
///
/// `inserted` holds every id in `index_b` absent from `index_a`; `deleted`
/// the reverse; `changed` every id in both whose title or body differs by
/// exact string comparison (case- and whitespace-sensitive). O(|A| + |B|)
/// expected time; no ordering assumption on input ids.
///
/// Both documents must be unmodified since their indexes were built.
pub fn diff_by_identity(
    doc_a: &Document,
    index_a: &IdentityIndex,
    doc_b: &Document,
    index_b: &IdentityIndex,
) -> DiffResult<ChangeSet> {
    let mut set = ChangeSet::default();

    for (id, pos_b) in index_b.iter() {
        if !index_a.contains(id) {
            set.inserted.insert(id, pos_b.clone());
        }
    }

    for (id, pos_a) in index_a.iter() {
        if !index_b.contains(id) {
            set.deleted.insert(id, pos_a.clone());
        }
    }

    for (id, _) in index_a.iter() {
        if let Some(pos_b) = index_b.get(id) {
            let a = doc_a.node(id)?;
            let b = doc_b.node(id)?;
            if a.title != b.title || a.body != b.body {
                set.changed.insert(id, pos_b.clone());
            }
        }
    }

    debug!(
        inserted = set.inserted.len(),
        deleted = set.deleted.len(),
        changed = set.changed.len(),
        "computed identity change set"
    );
    Ok(set)
}

use std::path::PathBuf;

use canopy_types::NodeId;

/// Errors produced by document operations.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    /// The document file does not exist.
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid document.
    #[error("malformed document {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// A position refers to a node that is not in this document's arena.
    #[error("position refers to unknown node {0:?}")]
    InvalidPosition(NodeId),

    /// Mounting a node under its own subtree would create a cycle.
    #[error("cloning {0:?} here would create a cycle")]
    WouldCycle(NodeId),

    /// Undo requested with an empty undo stack.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Redo requested with an empty redo stack.
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Convenience alias for outline results.
pub type OutlineResult<T> = Result<T, OutlineError>;

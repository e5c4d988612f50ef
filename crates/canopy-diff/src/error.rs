//! Error types for the diff crate.

use canopy_outline::OutlineError;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A position captured in an index no longer resolves in its document.
    /// The document was mutated between index build and diffing.
    #[error("stale index: {0}")]
    StaleIndex(#[from] OutlineError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;

//! Error types for report building and the compare operations.

use canopy_diff::DiffError;
use canopy_outline::OutlineError;

/// Errors that can occur while comparing documents or building reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A document or mutation operation failed.
    #[error(transparent)]
    Outline(#[from] OutlineError),

    /// The diff engine failed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// A subtree-compare request named a container that does not exist on
    /// one side. Non-fatal: the caller reports it and no report is built.
    #[error("no container titled {title:?} in {document}")]
    NoMatchingContainer { title: String, document: String },
}

/// Convenience alias for report results.
pub type ReportResult<T> = Result<T, ReportError>;

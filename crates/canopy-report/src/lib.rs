//! Comparison report building for Canopy.
//!
//! Takes the output of the diff engine and materializes it as a labeled
//! subtree grafted into a live document, choosing share-by-reference
//! (clone) or deep-copy-with-reownership per member. Also hosts the
//! end-to-end compare operations that tie loading, indexing, diffing, and
//! report building together.
//!
//! # Key Types
//!
//! - [`ReportSpec`] / [`build_report`] — Materialize an identity change set
//! - [`build_heading_report`] — Materialize a heading diff
//! - [`compare_documents`] / [`compare_subtrees`] / [`compare_anchored`] /
//!   [`diff_files`] — The compare operations

pub mod compare;
pub mod error;
pub mod report;

pub use compare::{
    compare_anchored, compare_documents, compare_subtrees, diff_files, CompareOutcome,
};
pub use error::{ReportError, ReportResult};
pub use report::{build_heading_report, build_report, ReportSpec};

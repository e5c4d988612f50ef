//! Diff engine for Canopy outlines.
//!
//! Computes structured comparisons between two outline documents or
//! subtrees, by stable node identity or by normalized heading.
//!
//! # Key Types
//!
//! - [`IdentityIndex`] / [`build_index`] — One-pass id → position index of a document
//! - [`ChangeSet`] / [`diff_by_identity`] — Inserted/deleted/changed partition
//! - [`HeadingDiff`] / [`diff_by_heading`] — Heading-matched structural diff
//! - [`DiffLine`] / [`full_diff`] / [`unified_diff`] — Line-level text diffs

pub mod changeset;
pub mod error;
pub mod heading;
pub mod index;
pub mod line_diff;

pub use changeset::{diff_by_identity, ChangeSet};
pub use error::{DiffError, DiffResult};
pub use heading::{diff_by_heading, normalize_title, scan_headings, HeadingDiff, HeadingEntry};
pub use index::{build_index, IdentityIndex};
pub use line_diff::{apply_patch, full_diff, render_lines, unified_diff, DiffLine};

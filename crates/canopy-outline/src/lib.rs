//! Document model for Canopy outlines.
//!
//! An outline is an ordered forest of titled nodes. Nodes live in an arena
//! keyed by [`NodeId`]; a tree location is described by a [`Position`]. The
//! same node may be mounted at several locations (a *clone* — edits through
//! any position hit the one arena entry), or duplicated into independent
//! storage (a *copy*).
//!
//! # Key Types
//!
//! - [`Document`] — Arena-backed outline with mutation API and grouped undo
//! - [`Node`] / [`NodeKind`] — A titled node with a text body and ordered children
//! - [`Position`] — A node at a specific tree location
//! - [`DocumentLoader`] / [`JsonLoader`] — Loading boundary for secondary documents

pub mod document;
pub mod error;
pub mod loader;
pub mod node;
pub mod position;
pub mod undo;

pub use document::{Document, Walk};
pub use error::{OutlineError, OutlineResult};
pub use loader::{read_file_text, DocumentLoader, JsonLoader};
pub use node::{Node, NodeKind};
pub use position::Position;

pub use canopy_types::NodeId;

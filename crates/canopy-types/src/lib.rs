//! Foundation types for Canopy.
//!
//! This crate provides the node identity type shared by every other Canopy
//! crate.
//!
//! # Key Types
//!
//! - [`NodeId`] — Stable, globally unique node identity
//! - [`TypeError`] — Parse errors for identity strings

pub mod error;
pub mod id;

pub use error::TypeError;
pub use id::NodeId;

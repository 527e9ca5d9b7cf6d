//! Shared types: node identifiers, TRS placement, colors.

pub mod types;

pub use types::{Color, NodeId, Placement};

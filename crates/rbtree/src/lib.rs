//! In-memory ordered map keyed by `i64`, balanced as a red-black tree.
//!
//! Supports insertion, point lookup, deletion, minimum and maximum retrieval
//! and clearing, each in O(log n) regardless of insertion order. A
//! breadth-first [`Walk`] exposes the shape of the tree for rendering, and
//! [`RbTree::validate`] audits the red-black invariants.

mod audit;
mod error;
mod tree;
mod view;

pub use audit::{Stats, Violation};
pub use error::{RbTreeError, Result};
pub use tree::{Color, RbTree};
pub use view::{NodeView, Walk};

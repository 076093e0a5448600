// =====================================================================
// File: btree/mod.rs
//
//! The `btree` module contains the self-balancing ordered index at the
//! heart of this crate.
//!
//! Structure:
//! - `node.rs`  : Defines the [`BTreeNode`] structure and its helpers.
//! - `tree.rs`  : Defines the [`BTree`] and its algorithms
//!                (insert, search, remove, traversal, validation).
//! - `tests.rs` : Unit tests for the B-tree (compiled only in test mode).
//!
//! This organization separates the small `BTreeNode` definition from
//! the larger `BTree` implementation for readability, while tests are
//! isolated to avoid cluttering the main code paths.
// =====================================================================

pub mod node;
pub mod tree;

pub use self::node::BTreeNode;
pub use self::tree::{BTree, Iter};

//! # btree-index
//! A generic, in-memory, self-balancing ordered index: a B-tree of
//! minimum degree `t` over any totally-ordered key type.
//!
//! ## Features
//! - `insert`, `remove`, `search`, and lazy in-order traversal
//! - Every non-root node keeps between `t - 1` and `2t - 1` keys and
//!   all leaves stay at the same depth after every mutation
//! - Single top-down mutation passes: children are split (insert) or
//!   refilled (remove) *before* descent, so nothing ever backtracks
//! - Strict ownership tree (`Box`ed children, no sharing, no cycles)
//! - Explicit [`BTree::validate`] surface for checking the invariants
//!
//! ## Usage
//! ```
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.contains(&12));
//! tree.remove(&6);
//!
//! let keys: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(keys, [5, 7, 10, 12, 17, 20, 30]);
//! ```
//!
//! Duplicates are permitted: inserting an equal key stores it again and
//! `remove` takes out one occurrence per call. The relative order among
//! equal keys is unspecified.
//!
//! The binary in `main.rs` provides a small demonstration driver; all
//! reusable logic and unit tests live here so the crate can be tested
//! with `cargo test`.

pub mod btree;
pub use btree::{BTree, BTreeNode, Iter};

pub mod error;
pub use error::{BTreeError, Result};

// =====================================================================
// File: error.rs
//
// Description:
//   Error taxonomy for the B-tree crate. The taxonomy is deliberately
//   small: construction is the only operation that can fail, and the
//   explicit `validate` surface reports invariant violations found
//   while walking a tree.
//
// Notes:
//   * Search and remove on an absent key are defined outcomes
//     (None / no-op), never errors.
// =====================================================================
use thiserror::Error;

/// Errors produced by the B-tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BTreeError {
    /// The requested minimum degree cannot form a valid B-tree.
    #[error("invalid minimum degree {0}: a B-tree requires t >= 2")]
    InvalidConfiguration(usize),

    /// A structural invariant does not hold (reported by [`validate`]).
    ///
    /// [`validate`]: crate::BTree::validate
    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type alias for B-tree operations.
pub type Result<T> = std::result::Result<T, BTreeError>;

// =====================================================================
// File: btree/node.rs
//
// Description:
//   Defines the core B-tree node structure (`BTreeNode`) used by the
//   ordered index. Each node maintains:
//
//   - `keys`    : Keys stored within the node, kept in non-decreasing
//                 order. A node holds at most `2t - 1` of them.
//   - `children`: Owned child nodes (empty if this node is a leaf).
//                 An internal node has exactly `keys.len() + 1`.
//   - `is_leaf` : Boolean flag indicating whether the node is a leaf.
//
// Notes:
//   * The capacity limits are logical invariants enforced by the
//     split/merge logic in `tree.rs`, not physical bounds here.
//   * This file contains only the node representation and bound
//     helpers. Higher-level operations (insert, search, remove)
//     are implemented in `tree.rs`.
// =====================================================================

/// Basic foundational B-tree node.
#[derive(Debug)]
pub struct BTreeNode<K> {
    /// Keys held by this node, sorted non-decreasing.
    pub keys: Vec<K>,
    /// Box allows Rust to recursively own nodes on the heap.
    pub children: Vec<Box<BTreeNode<K>>>,
    /// True iff `children` is empty.
    pub is_leaf: bool,
}

impl<K> BTreeNode<K> {
    /// Creates a new empty B-tree node.
    ///
    /// # Arguments
    ///
    /// * `is_leaf` - Whether this node is a leaf (has no children) or
    ///   an internal node (may have children).
    ///
    /// # Example
    /// ```
    /// use btree_index::BTreeNode;
    /// let leaf: BTreeNode<i32> = BTreeNode::new(true);
    /// assert!(leaf.keys.is_empty());
    /// assert!(leaf.is_leaf);
    /// ```
    pub fn new(is_leaf: bool) -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            is_leaf,
        }
    }
}

impl<K: Ord> BTreeNode<K> {
    /// Returns the index of the first key that is `>= key`, or
    /// `keys.len()` if every stored key is smaller.
    ///
    /// Unlike a plain binary search this is stable in the presence of
    /// duplicates: it always lands on the *first* matching position.
    ///
    /// # Example
    /// ```
    /// use btree_index::BTreeNode;
    ///
    /// let mut node = BTreeNode::new(true);
    /// node.keys.extend([10, 20, 20, 30]);
    ///
    /// assert_eq!(node.lower_bound(&5), 0);
    /// assert_eq!(node.lower_bound(&20), 1);
    /// assert_eq!(node.lower_bound(&31), 4);
    /// ```
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Returns the index of the first key that is strictly `> key`,
    /// i.e. the position just past any run of equal keys.
    pub fn upper_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }
}

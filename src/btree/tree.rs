// =====================================================================
// File: btree/tree.rs
//
// Description:
//   Implements the B-tree (`BTree`) that manages insertion, search,
//   deletion, and in-order traversal over `BTreeNode` structures.
//   The minimum degree `t` bounds every node to `[t-1, 2t-1]` keys
//   (the root may hold fewer) and all leaves sit at the same depth.
//
// Features:
//   - `insert`  : Adds a key; duplicates are stored again.
//   - `search`  : Standard B-tree search; returns the stored key.
//   - `remove`  : Removes one occurrence while preserving invariants.
//   - `iter`    : Lazy ascending traversal over borrowed keys.
//   - `validate`: Walks the tree and reports the first broken invariant.
//   - Split/borrow/merge helpers: Maintain balance during mutation.
//
// Notes:
//   * Relies on `node.rs` for the `BTreeNode` definition.
//   * Internal helpers are associated functions taking the node plus
//     `t` explicitly, which keeps the recursive borrows simple.
//   * Both mutation paths are single top-down passes: a full child is
//     split before descent on insert, and an underfull child is filled
//     before descent on remove, so neither ever backtracks.
// =====================================================================
use tracing::{debug, trace};

use super::BTreeNode;
use crate::error::{BTreeError, Result};

/// A generic in-memory B-tree over any totally-ordered key type.
///
/// Contains the minimum degree (`t`) and the owning root reference.
/// `root` is `None` exactly when the tree holds zero keys.
#[derive(Debug)]
pub struct BTree<K> {
    pub t: usize,
    pub root: Option<Box<BTreeNode<K>>>,
}

impl<K: Ord> BTree<K> {
    /// Create a new empty B-tree with minimum degree `t`.
    ///
    /// # Errors
    /// Returns [`BTreeError::InvalidConfiguration`] if `t < 2`; no tree
    /// is produced in that case.
    ///
    /// # Example
    /// ```
    /// use btree_index::{BTree, BTreeError};
    /// let tree = BTree::<i32>::new(3).unwrap();
    /// assert!(tree.is_empty());
    /// assert_eq!(
    ///     BTree::<i32>::new(1).unwrap_err(),
    ///     BTreeError::InvalidConfiguration(1),
    /// );
    /// ```
    pub fn new(t: usize) -> Result<Self> {
        if t < 2 {
            return Err(BTreeError::InvalidConfiguration(t));
        }
        Ok(Self { t, root: None })
    }

    /// True if the tree holds zero keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Search for a key in the B-tree.
    ///
    /// Traverses the tree from the root, descending into child nodes as
    /// needed, to locate the target key.
    ///
    /// # Returns
    /// * `Some(&K)` with a reference to the first stored key equal to
    ///   `key` on the search path.
    /// * `None` if the key is not in the tree.
    ///
    /// # Notes
    /// - Never mutates the tree.
    /// - Runs in O(log n) node visits thanks to the height guarantee.
    ///
    /// # Example
    /// ```
    /// use btree_index::BTree;
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(7);
    /// assert_eq!(tree.search(&7), Some(&7));
    /// assert_eq!(tree.search(&8), None);
    /// ```
    pub fn search(&self, key: &K) -> Option<&K> {
        // Recursive function declaration for node search
        fn search_node<'a, K: Ord>(node: &'a BTreeNode<K>, key: &K) -> Option<&'a K> {
            // Find the position in this node where the key would belong
            let idx = node.lower_bound(key);

            // Base case - found the key in the current node
            if idx < node.keys.len() && node.keys[idx] == *key {
                return Some(&node.keys[idx]);
            }

            // No key here and nowhere further to look - search ends
            if node.is_leaf {
                None

            // No key here, there are children, so recursive search
            } else {
                search_node(&node.children[idx], key)
            }
        }
        search_node(self.root.as_deref()?, key)
    }

    /// True if `key` is present in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Insert a key into the B-tree.
    ///
    /// - Duplicates are permitted and simply stored again; callers that
    ///   need uniqueness must check with [`contains`](Self::contains)
    ///   first.
    /// - If the root node is full, the tree grows in height by
    ///   splitting the root before descending.
    ///
    /// # Example
    /// ```
    /// use btree_index::BTree;
    /// let mut tree = BTree::new(2).unwrap();
    /// for k in [3, 1, 2, 1] {
    ///     tree.insert(k);
    /// }
    /// let keys: Vec<&i32> = tree.iter().collect();
    /// assert_eq!(keys, [&1, &1, &2, &3]);
    /// ```
    pub fn insert(&mut self, key: K) {
        let t = self.t;

        match self.root.take() {
            // Empty tree: the key becomes a one-key leaf root
            None => {
                let mut root = BTreeNode::new(true);
                root.keys.push(key);
                self.root = Some(Box::new(root));
            }

            // Root is full: grow in height, then descend
            Some(old_root) if old_root.keys.len() == 2 * t - 1 => {
                debug!("root full, splitting to grow tree height");
                let mut new_root = Box::new(BTreeNode::new(false));
                new_root.children.push(old_root);
                Self::split_child(&mut new_root, t, 0);

                // Choose which half to descend into (equal keys go right)
                let idx = usize::from(new_root.keys[0] <= key);
                Self::insert_non_full(&mut new_root.children[idx], t, key);
                self.root = Some(new_root);
            }

            // Root not full - normal descent
            Some(mut root) => {
                Self::insert_non_full(&mut root, t, key);
                self.root = Some(root);
            }
        }
    }

    /// Remove one occurrence of a key from the B-tree, if present.
    ///
    /// This follows the standard single-pass B-tree deletion algorithm:
    /// - A key in a leaf node is removed directly.
    /// - A key in an internal node is overwritten with its in-subtree
    ///   predecessor or successor (extracted by removal, not cloned),
    ///   or the surrounding children are merged and deletion recurses.
    /// - Before every descent the target child is topped up to at least
    ///   `t` keys by borrowing from a sibling or merging.
    ///
    /// # Behavior
    /// - Maintains all B-tree invariants after removal.
    /// - If the key does not exist, the stored key sequence is
    ///   unchanged (the tree may still rebalance along the search path).
    ///
    /// # Example
    /// ```
    /// use btree_index::BTree;
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(4);
    /// tree.remove(&4);
    /// assert!(tree.is_empty());
    /// tree.remove(&4); // absent: silently a no-op
    /// ```
    pub fn remove(&mut self, key: &K) {
        let t = self.t;
        let Some(mut root) = self.root.take() else {
            return;
        };

        Self::remove_from(&mut root, t, key);

        // Tree-level shrink: an emptied root either ends the tree (leaf)
        // or hands over to its sole remaining child (internal).
        if root.keys.is_empty() {
            if !root.is_leaf {
                debug!("root emptied, shrinking tree height");
                self.root = Some(root.children.remove(0));
            }
            // Leaf root with no keys: the tree is now empty
        } else {
            self.root = Some(root);
        }
    }

    // =========================
    // Insertion helpers
    // =========================

    /// Inserts a key into the subtree rooted at `node`, which must not
    /// be full.
    ///
    /// # Behavior
    /// - **Leaf node**: insert at the sorted position (just past any
    ///   equal keys).
    /// - **Internal node**: split the target child first if it is full,
    ///   then recurse into the child whose range covers `key`.
    ///
    /// The caller guarantees `node` has room, and the pre-descent split
    /// re-establishes that guarantee one level down, so the whole
    /// insertion is a single downward pass.
    fn insert_non_full(node: &mut BTreeNode<K>, t: usize, key: K) {
        let mut idx = node.upper_bound(&key);

        // Base case - leaf insert at the sorted position
        if node.is_leaf {
            node.keys.insert(idx, key);
            return;
        }

        // Check the child we are about to enter is not full
        if node.children[idx].keys.len() == 2 * t - 1 {
            Self::split_child(node, t, idx);

            // After the split decide which half to descend into
            if node.keys[idx] <= key {
                idx += 1;
            }
        }

        // Recurse into the appropriate child
        Self::insert_non_full(&mut node.children[idx], t, key);
    }

    /// Split the full child at `node.children[i]` during insertion.
    ///
    /// The left child keeps the first `t - 1` keys, a newly allocated
    /// right sibling receives the last `t - 1`, and the median key moves
    /// up into the parent at position `i`. If the child is internal its
    /// children are divided the same way. This is the only place new
    /// nodes are allocated during insertion.
    fn split_child(node: &mut BTreeNode<K>, t: usize, i: usize) {
        trace!(child = i, "splitting full child");

        // We are here because the child node is full
        let full_child = &mut node.children[i];
        let mut right = Box::new(BTreeNode::new(full_child.is_leaf));

        // Right node takes the t-1 largest keys
        right.keys = full_child.keys.split_off(t);
        // The median is left on top of the left half
        let median = full_child.keys.pop().expect("full child must have a median");

        // If internal, divide children too: left keeps [0..t), right takes [t..]
        if !full_child.is_leaf {
            right.children = full_child.children.split_off(t);
        }

        // Promote the median into the parent and link the new right child
        node.keys.insert(i, median);
        node.children.insert(i + 1, right);
    }

    // =========================
    // Deletion helpers
    // =========================

    /// Recursive helper for deleting one occurrence of `key` from the
    /// subtree rooted at `node`.
    ///
    /// # Behavior
    /// 1. **Key found in this node**
    ///    - Leaf: remove the key directly.
    ///    - Internal: handled by [`remove_from_internal`](Self::remove_from_internal).
    /// 2. **Key not found in this node**
    ///    - Leaf: the key is absent from the tree, nothing to do.
    ///    - Internal: fill the target child up to `t` keys if needed
    ///      (borrow or merge), then recurse into it using the corrected
    ///      index returned by [`fill_child`](Self::fill_child).
    ///
    /// The caller guarantees `node` has at least `t` keys unless it is
    /// the root, so removing a key here can never underflow mid-pass.
    fn remove_from(node: &mut BTreeNode<K>, t: usize, key: &K) {
        let idx = node.lower_bound(key);

        // First case - the key is in this node
        if idx < node.keys.len() && node.keys[idx] == *key {
            if node.is_leaf {
                // Leaf node - just remove
                node.keys.remove(idx);
            } else {
                Self::remove_from_internal(node, t, idx, key);
            }
            return;
        }

        // Key is not in this node; in a leaf that means not in the tree
        if node.is_leaf {
            return;
        }

        // Top up child[idx] before descending; the fill may shift the
        // descent position, so always use the returned index.
        let idx = Self::fill_child(node, t, idx);
        Self::remove_from(&mut node.children[idx], t, key);
    }

    /// Removes `node.keys[idx]` when `node` is internal.
    ///
    /// - Left child rich (>= `t` keys): overwrite with the in-subtree
    ///   predecessor pulled out by [`remove_max`](Self::remove_max).
    /// - Right child rich: symmetric, using the successor.
    /// - Both children at `t - 1`: merge them around the key and recurse
    ///   into the merged node, where the key is now guaranteed present.
    fn remove_from_internal(node: &mut BTreeNode<K>, t: usize, idx: usize, key: &K) {
        if node.children[idx].keys.len() >= t {
            // Replace with predecessor
            let pred = Self::remove_max(&mut node.children[idx], t);
            node.keys[idx] = pred;
        } else if node.children[idx + 1].keys.len() >= t {
            // Replace with successor
            let succ = Self::remove_min(&mut node.children[idx + 1], t);
            node.keys[idx] = succ;
        } else {
            // Merge children[idx] + key + children[idx+1], then recurse
            Self::merge_children(node, idx);
            Self::remove_from(&mut node.children[idx], t, key);
        }
    }

    /// Removes and returns the maximum key of the subtree rooted at
    /// `node` (the predecessor of the separator above it).
    ///
    /// Maintains the fill-before-descent rule on the way down, so the
    /// final leaf pop can never underflow. The caller guarantees `node`
    /// itself has at least `t` keys.
    fn remove_max(node: &mut BTreeNode<K>, t: usize) -> K {
        if node.is_leaf {
            return node.keys.pop().expect("subtree holds at least one key");
        }
        let last = node.children.len() - 1;
        let idx = Self::fill_child(node, t, last);
        Self::remove_max(&mut node.children[idx], t)
    }

    /// Removes and returns the minimum key of the subtree rooted at
    /// `node` (the successor of the separator above it).
    fn remove_min(node: &mut BTreeNode<K>, t: usize) -> K {
        if node.is_leaf {
            return node.keys.remove(0);
        }
        let idx = Self::fill_child(node, t, 0);
        Self::remove_min(&mut node.children[idx], t)
    }

    /// Ensures the child at `idx` has at least `t` keys before descent
    /// and returns the index the caller must descend into.
    ///
    /// # Behavior
    /// - Child already has >= `t` keys: nothing to do.
    /// - Otherwise borrow from the left sibling, else the right sibling,
    ///   else merge with a sibling (the right one, unless the child is
    ///   the last, in which case it merges into its left sibling).
    ///
    /// Returning the corrected index is the whole point: merging the
    /// last child into its left sibling shifts the target one slot
    /// left, and reusing the pre-merge index there walks off the end of
    /// `children`.
    fn fill_child(node: &mut BTreeNode<K>, t: usize, idx: usize) -> usize {
        // If the child already has enough keys, nothing to do
        if node.children[idx].keys.len() >= t {
            return idx;
        }

        if idx > 0 && node.children[idx - 1].keys.len() >= t {
            // Borrow from the left sibling
            Self::borrow_from_prev(node, idx);
            idx
        } else if idx + 1 < node.children.len() && node.children[idx + 1].keys.len() >= t {
            // Borrow from the right sibling
            Self::borrow_from_next(node, idx);
            idx
        } else if idx + 1 < node.children.len() {
            // Merge with the right sibling; target index is unchanged
            Self::merge_children(node, idx);
            idx
        } else {
            // Last child: merge into the left sibling and shift the target
            Self::merge_children(node, idx - 1);
            idx - 1
        }
    }

    /// Borrows a key from the left sibling of `node.children[idx]`.
    ///
    /// The separator `node.keys[idx - 1]` rotates down to the front of
    /// the underfull child, and the left sibling's last key rotates up
    /// to replace it. For internal nodes the sibling's last child moves
    /// across to become the child's new first child.
    fn borrow_from_prev(node: &mut BTreeNode<K>, idx: usize) {
        trace!(child = idx, "borrowing key from left sibling");

        // Child idx borrows one key from child idx-1 via the parent
        let (left_slice, right_slice) = node.children.split_at_mut(idx);
        let left = &mut left_slice[idx - 1];
        let child = &mut right_slice[0];

        // Rotate: left's last key up, the old separator down
        let donated = left.keys.pop().expect("left sibling has a key to spare");
        let separator = std::mem::replace(&mut node.keys[idx - 1], donated);
        child.keys.insert(0, separator);

        // If internal, a child pointer moves with the key
        if !child.is_leaf {
            let moved = left.children.pop().expect("internal sibling has a child to move");
            child.children.insert(0, moved);
        }
    }

    /// Borrows a key from the right sibling of `node.children[idx]`.
    /// Mirror rotation of [`borrow_from_prev`](Self::borrow_from_prev).
    fn borrow_from_next(node: &mut BTreeNode<K>, idx: usize) {
        trace!(child = idx, "borrowing key from right sibling");

        // Child idx borrows one key from child idx+1 via the parent
        let (left_slice, right_slice) = node.children.split_at_mut(idx + 1);
        let child = &mut left_slice[idx];
        let right = &mut right_slice[0];

        // Rotate: right's first key up, the old separator down
        let donated = right.keys.remove(0);
        let separator = std::mem::replace(&mut node.keys[idx], donated);
        child.keys.push(separator);

        // If internal, a child pointer moves with the key
        if !child.is_leaf {
            let moved = right.children.remove(0);
            child.children.push(moved);
        }
    }

    /// Merge `node.children[idx]`, the separating parent key, and
    /// `node.children[idx + 1]` into a single child at `idx`.
    ///
    /// Both children must hold exactly `t - 1` keys, producing one full
    /// node of `2t - 1`. The right sibling is consumed and dropped here;
    /// this is the inverse of `split_child` and the only place nodes are
    /// freed during mutation.
    fn merge_children(node: &mut BTreeNode<K>, idx: usize) {
        trace!(child = idx, "merging child with right sibling");

        let mut right = node.children.remove(idx + 1);
        let separator = node.keys.remove(idx);
        let left = &mut node.children[idx];

        // Bring the separator down and append the right child's keys
        left.keys.push(separator);
        left.keys.append(&mut right.keys);

        // If internal, also merge child pointers
        if !left.is_leaf {
            left.children.append(&mut right.children);
        }
        // `right` is dropped at end of scope
    }

    // =========================
    // Traversal
    // =========================

    /// Returns a lazy in-order iterator over the stored keys.
    ///
    /// Keys are yielded in non-decreasing order. The iterator borrows
    /// the tree immutably, allocates no intermediate buffer, and can be
    /// recreated (restarted) at any time with another call to `iter`.
    ///
    /// # Example
    /// ```
    /// use btree_index::BTree;
    /// let mut tree = BTree::new(3).unwrap();
    /// for k in [10, 20, 5, 6, 12, 30, 7, 17] {
    ///     tree.insert(k);
    /// }
    /// let keys: Vec<i32> = tree.iter().copied().collect();
    /// assert_eq!(keys, [5, 6, 7, 10, 12, 17, 20, 30]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_deref())
    }

    // =========================
    // Verification
    // =========================

    /// Walk the whole tree and verify every structural invariant.
    ///
    /// Checked per node: occupancy within `[t-1, 2t-1]` (root exempt on
    /// the low end), `children.len() == keys.len() + 1` for internal
    /// nodes, keys in non-decreasing order, child key ranges interleaving
    /// with the separators, and all leaves at the same depth.
    ///
    /// # Errors
    /// Returns [`BTreeError::InvariantViolation`] describing the first
    /// violation found. Intended for tests and debugging; a tree touched
    /// only through this crate's API always passes.
    pub fn validate(&self) -> Result<()> {
        match self.root.as_deref() {
            None => Ok(()),
            Some(root) => Self::validate_node(root, self.t, true).map(|_| ()),
        }
    }

    /// Recursively checks the subtree at `node`, returning its leaf
    /// depth and the smallest/largest key it contains.
    fn validate_node<'a>(
        node: &'a BTreeNode<K>,
        t: usize,
        is_root: bool,
    ) -> Result<(usize, &'a K, &'a K)> {
        let n = node.keys.len();

        if n == 0 {
            return Err(BTreeError::InvariantViolation(
                "node holds no keys".into(),
            ));
        }
        if n > 2 * t - 1 {
            return Err(BTreeError::InvariantViolation(format!(
                "node holds {n} keys, more than the 2t-1 = {} allowed",
                2 * t - 1
            )));
        }
        if !is_root && n < t - 1 {
            return Err(BTreeError::InvariantViolation(format!(
                "non-root node holds {n} keys, fewer than the t-1 = {} required",
                t - 1
            )));
        }
        if node.keys.windows(2).any(|w| w[0] > w[1]) {
            return Err(BTreeError::InvariantViolation(
                "node keys are not in sorted order".into(),
            ));
        }

        if node.is_leaf {
            if !node.children.is_empty() {
                return Err(BTreeError::InvariantViolation(
                    "leaf node has children".into(),
                ));
            }
            let min = node.keys.first().expect("checked non-empty above");
            let max = node.keys.last().expect("checked non-empty above");
            return Ok((0, min, max));
        }

        if node.children.len() != n + 1 {
            return Err(BTreeError::InvariantViolation(format!(
                "internal node with {n} keys has {} children instead of {}",
                node.children.len(),
                n + 1
            )));
        }

        // Recurse through the children, checking equal leaf depth and
        // that the child ranges interleave with the separator keys.
        // Equal keys may legally sit on either side of a separator, so
        // the range checks are non-strict.
        let mut depth = None;
        let mut subtree_min = None;
        let mut subtree_max = None;

        for (i, child) in node.children.iter().enumerate() {
            let (child_depth, child_min, child_max) = Self::validate_node(child, t, false)?;

            match depth {
                None => depth = Some(child_depth),
                Some(d) if d != child_depth => {
                    return Err(BTreeError::InvariantViolation(
                        "leaves are not all at the same depth".into(),
                    ));
                }
                Some(_) => {}
            }
            if i > 0 && *child_min < node.keys[i - 1] {
                return Err(BTreeError::InvariantViolation(format!(
                    "child {i} holds a key below the separator before it"
                )));
            }
            if i < n && *child_max > node.keys[i] {
                return Err(BTreeError::InvariantViolation(format!(
                    "child {i} holds a key above the separator after it"
                )));
            }

            if i == 0 {
                subtree_min = Some(child_min);
            }
            if i == node.children.len() - 1 {
                subtree_max = Some(child_max);
            }
        }

        let depth = depth.expect("internal node has children");
        let min = subtree_min.expect("internal node has a first child");
        let max = subtree_max.expect("internal node has a last child");
        Ok((depth + 1, min, max))
    }
}

/// Lazy in-order iterator over the keys of a [`BTree`].
///
/// Keeps an explicit stack of `(node, next key index)` frames instead of
/// recursing, so the borrow lasts only as long as the iterator. Stack
/// depth is bounded by the tree height.
#[derive(Debug)]
pub struct Iter<'a, K> {
    stack: Vec<(&'a BTreeNode<K>, usize)>,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: Option<&'a BTreeNode<K>>) -> Self {
        let mut iter = Iter { stack: Vec::new() };
        if let Some(node) = root {
            iter.push_leftmost(node);
        }
        iter
    }

    /// Pushes `node` and the chain of first children below it, so the
    /// smallest unvisited key sits on top of the stack.
    fn push_leftmost(&mut self, mut node: &'a BTreeNode<K>) {
        loop {
            self.stack.push((node, 0));
            if node.is_leaf {
                break;
            }
            node = &node.children[0];
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            let (node, idx) = self.stack.pop()?;

            // Frame exhausted: resume in the parent frame below it
            if idx == node.keys.len() {
                continue;
            }

            // Emit keys[idx]; the subtree left of it was already walked
            self.stack.push((node, idx + 1));
            if !node.is_leaf {
                self.push_leftmost(&node.children[idx + 1]);
            }
            return Some(&node.keys[idx]);
        }
    }
}

impl<'a, K: Ord> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Cursors and in-order stepping over the tree.

use super::node::NodeId;
use super::{NodeAllocator, RbTree};

/// A position in an [`RbTree`].
///
/// A cursor is a plain handle: it does not borrow the tree, so it can be kept
/// across mutations and handed back to [`RbTree::erase`]. It names either a node
/// or the end position (the sentinel). Erasing a node makes every cursor to it
/// stale; erasing other nodes leaves it valid.
///
/// Stepping is done through the tree and wraps around the end position like a
/// ring: stepping forward from the maximum reaches `end`, and stepping forward
/// from `end` reaches the minimum.
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::RbTree;
///
/// let tree: RbTree<i32> = [2, 1, 3].into_iter().collect();
///
/// let mut cursor = tree.begin();
/// let mut seen = Vec::new();
/// while let Some(value) = tree.get(cursor) {
///     seen.push(*value);
///     cursor = tree.next(cursor);
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// assert_eq!(cursor, tree.end());
/// assert_eq!(tree.get(tree.prev(cursor)), Some(&3));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cursor {
    node: NodeId,
}

impl Cursor {
    #[inline]
    pub(crate) const fn new(node: NodeId) -> Self {
        Self { node }
    }

    /// Returns the handle of the node this cursor names.
    #[inline]
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.node
    }

    /// Returns `true` if this is the end position.
    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.node.is_sentinel()
    }
}

impl<V, X, C, A: NodeAllocator<V>> RbTree<V, X, C, A> {
    /// Returns the in-order successor of `cursor`.
    ///
    /// The successor of the maximum is `end()`; the successor of `end()` is
    /// `begin()`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` names a node that is no longer in the tree.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        if cursor.is_end() {
            return self.begin();
        }
        let mut current = cursor.node();
        if let Some(right) = self.node(current).right {
            return Cursor::new(self.minimum(right));
        }
        loop {
            let parent = self.node(current).parent;
            if parent.is_sentinel() || self.node(parent).left == Some(current) {
                return Cursor::new(parent);
            }
            current = parent;
        }
    }

    /// Returns the in-order predecessor of `cursor`.
    ///
    /// The predecessor of `end()` is the maximum, read from the cached bound;
    /// the predecessor of the minimum is `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` names a node that is no longer in the tree.
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        if cursor.is_end() {
            return Cursor::new(self.sentinel.rightmost);
        }
        let mut current = cursor.node();
        if let Some(left) = self.node(current).left {
            return Cursor::new(self.maximum(left));
        }
        loop {
            let parent = self.node(current).parent;
            if parent.is_sentinel() || self.node(parent).right == Some(current) {
                return Cursor::new(parent);
            }
            current = parent;
        }
    }
}

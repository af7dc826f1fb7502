//! The red-black tree engine behind every ordered container in this crate.
//!
//! [`RbTree`] stores values in nodes obtained from a [`NodeAllocator`], orders
//! them through a [`KeyExtractor`] and a [`Comparator`], and hands out
//! [`Cursor`]s as positions. It never merges equal keys: whether a duplicate is
//! admitted is decided by the wrapper containers.
//!
//! # Overview
//!
//! - O(log N) `insert`, `find`, `erase`
//! - O(1) `begin`, `end`, `len`, `is_empty`, and stepping back from `end`
//! - O(1) amortized cursor stepping in both directions, with no auxiliary stack
//!
//! # Examples
//!
//! ```rust
//! use ordtree::tree::RbTree;
//!
//! let mut tree: RbTree<i32> = RbTree::new();
//! for value in [5, 3, 5, 1, 5] {
//!     tree.insert(value).unwrap();
//! }
//!
//! let values: Vec<&i32> = tree.iter().collect();
//! assert_eq!(values, vec![&1, &3, &5, &5, &5]);
//!
//! let found = tree.find(&3);
//! assert_eq!(tree.get(found), Some(&3));
//! assert_eq!(tree.erase(found), 3);
//! assert!(tree.find(&3).is_end());
//! ```
//!
//! # Internal Structure
//!
//! Nodes are linked by [`NodeId`] handles. Each node owns its children through
//! `left`/`right`; `parent` is a back-reference used only to climb. A single
//! sentinel, addressed by [`NodeId::SENTINEL`], is the parent of the root, the
//! end position, and the cache of the leftmost and rightmost nodes.
//!
//! After every public operation:
//! 1. An in-order walk yields keys in non-decreasing order; equal keys keep
//!    their insertion order
//! 2. No red node has a red child
//! 3. Every root-to-leaf path has the same number of black nodes
//! 4. The sentinel is black, and so is the root of a non-empty tree
//! 5. The sentinel caches the minimum and maximum nodes
//! 6. `len()` equals the number of reachable nodes

mod allocator;
mod cursor;
mod iter;
mod node;
mod rebalance;
mod validate;

pub use allocator::NodeAllocator;
pub use allocator::PoolAllocator;
pub use cursor::Cursor;
pub use iter::IntoIter;
pub use iter::Iter;
pub use node::Color;
pub use node::Node;
pub use node::NodeId;

use std::fmt;
use std::marker::PhantomData;

use node::{Sentinel, Side};

use crate::error::AllocationError;
use crate::ordering::{Comparator, Identity, KeyExtractor, NaturalOrder};

// =============================================================================
// RbTree Definition
// =============================================================================

/// A red-black tree over values of type `V`.
///
/// `X` extracts the ordering key from a value, `C` compares keys, and `A`
/// provides node storage.
///
/// # Time Complexity
///
/// | Operation         | Complexity        |
/// |-------------------|-------------------|
/// | `insert`          | O(log N)          |
/// | `find`            | O(log N)          |
/// | `erase`           | O(log N)          |
/// | `begin` / `end`   | O(1)              |
/// | `next` / `prev`   | O(1) amortized    |
/// | `len`             | O(1)              |
/// | `clear`           | O(capacity)       |
///
/// # Examples
///
/// ```rust
/// use ordtree::ordering::{First, ReverseOrder};
/// use ordtree::tree::{PoolAllocator, RbTree};
///
/// let mut tree = RbTree::with_parts(First, ReverseOrder, PoolAllocator::new());
/// tree.insert((1, "one")).unwrap();
/// tree.insert((3, "three")).unwrap();
/// tree.insert((2, "two")).unwrap();
///
/// let keys: Vec<i32> = tree.iter().map(|(key, _)| *key).collect();
/// assert_eq!(keys, vec![3, 2, 1]);
/// ```
#[derive(Clone)]
pub struct RbTree<V, X = Identity, C = NaturalOrder, A = PoolAllocator<V>> {
    sentinel: Sentinel,
    length: usize,
    key_extractor: X,
    comparator: C,
    allocator: A,
    value_marker: PhantomData<V>,
}

impl<V, X: Default, C: Default, A: Default> RbTree<V, X, C, A> {
    /// Creates an empty tree with default collaborators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let tree: RbTree<String> = RbTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.begin(), tree.end());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(X::default(), C::default(), A::default())
    }
}

impl<V, X, C, A> RbTree<V, X, C, A> {
    /// Creates an empty tree from its three collaborators.
    #[inline]
    #[must_use]
    pub const fn with_parts(key_extractor: X, comparator: C, allocator: A) -> Self {
        Self {
            sentinel: Sentinel::empty(),
            length: 0,
            key_extractor,
            comparator,
            allocator,
            value_marker: PhantomData,
        }
    }

    /// Returns the number of values in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns a cursor to the minimum value, or the end cursor if empty.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Cursor {
        Cursor::new(self.sentinel.leftmost)
    }

    /// Returns the end cursor: the sentinel, one past the maximum value.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Cursor {
        Cursor::new(NodeId::SENTINEL)
    }

    /// Returns the key extractor.
    #[inline]
    pub const fn key_extractor(&self) -> &X {
        &self.key_extractor
    }

    /// Returns the comparator.
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the node allocator.
    #[inline]
    pub const fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<V, X, C, A: NodeAllocator<V>> RbTree<V, X, C, A> {
    /// Returns the value at `cursor`, or `None` for the end cursor or a cursor
    /// whose node has been erased.
    #[inline]
    pub fn get(&self, cursor: Cursor) -> Option<&V> {
        if cursor.is_end() {
            return None;
        }
        self.allocator.get(cursor.node()).map(Node::value)
    }

    /// Returns the value at `cursor` mutably. Callers must not change the
    /// value's key.
    #[inline]
    #[cfg_attr(not(feature = "containers"), allow(dead_code))]
    pub(crate) fn get_mut(&mut self, cursor: Cursor) -> Option<&mut V> {
        if cursor.is_end() {
            return None;
        }
        self.allocator
            .get_mut(cursor.node())
            .map(|node| &mut node.value)
    }

    /// Returns the minimum value.
    #[inline]
    pub fn first(&self) -> Option<&V> {
        self.get(self.begin())
    }

    /// Returns the maximum value.
    #[inline]
    pub fn last(&self) -> Option<&V> {
        self.get(Cursor::new(self.sentinel.rightmost))
    }

    /// Removes the value at `cursor`, rebalances, and returns the value.
    ///
    /// Every other live cursor stays valid.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end cursor or names a node that is no longer
    /// in the tree. Passing a cursor obtained from a different tree is a
    /// contract violation with unspecified results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let mut tree: RbTree<i32> = (1..=3).collect();
    /// let middle = tree.find(&2);
    /// assert_eq!(tree.erase(middle), 2);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn erase(&mut self, cursor: Cursor) -> V {
        let target = cursor.node();
        assert!(!target.is_sentinel(), "cannot erase the end cursor");
        assert!(
            self.allocator.get(target).is_some(),
            "cursor {target} does not name a live node of this tree"
        );

        let (left, right, target_color, target_parent) = {
            let node = self.node(target);
            (node.left, node.right, node.color, node.parent)
        };

        // `removed_color` is the color that left the structure; `replacement`
        // moved into its place under `replacement_parent`.
        let (removed_color, replacement, replacement_parent) = match (left, right) {
            (None, _) => {
                self.transplant(target, right);
                (target_color, right, target_parent)
            }
            (Some(_), None) => {
                self.transplant(target, left);
                (target_color, left, target_parent)
            }
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                let successor_color = self.node(successor).color;
                let replacement = self.node(successor).right;
                let replacement_parent = if self.node(successor).parent == target {
                    successor
                } else {
                    let successor_parent = self.node(successor).parent;
                    self.transplant(successor, replacement);
                    self.node_mut(successor).right = Some(right);
                    self.node_mut(right).parent = successor;
                    successor_parent
                };
                self.transplant(target, Some(successor));
                let successor_node = self.node_mut(successor);
                successor_node.left = Some(left);
                successor_node.color = target_color;
                self.node_mut(left).parent = successor;
                (successor_color, replacement, replacement_parent)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            node = %target,
            two_children = (left.is_some() && right.is_some()),
            removed_black = (removed_color == Color::Black),
            "RbTree: erase"
        );

        if removed_color == Color::Black {
            self.erase_fixup(replacement, replacement_parent);
        }
        self.refresh_bounds();
        self.length -= 1;

        let Some(node) = self.allocator.destroy(target) else {
            unreachable!("erased node {target} was checked to be live");
        };
        node.into_value()
    }

    /// Destroys every value and resets the tree to empty.
    ///
    /// Every outstanding cursor except `end()` becomes stale.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(length = self.length, "RbTree: clear");

        self.allocator.reset();
        self.sentinel = Sentinel::empty();
        self.length = 0;
    }

    // -------------------------------------------------------------------------
    // Link helpers
    // -------------------------------------------------------------------------

    fn node(&self, id: NodeId) -> &Node<V> {
        self.allocator
            .get(id)
            .unwrap_or_else(|| panic!("{id} does not name a live node of this tree"))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.allocator
            .get_mut(id)
            .unwrap_or_else(|| panic!("{id} does not name a live node of this tree"))
    }

    /// Absent children are black leaves.
    fn color_of(&self, link: Option<NodeId>) -> Color {
        link.map_or(Color::Black, |id| self.node(id).color)
    }

    /// Which side of its parent `id` hangs on. `id` must not be the root.
    fn side_of(&self, id: NodeId) -> Side {
        let parent = self.node(id).parent;
        if self.node(parent).left == Some(id) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points `parent`'s link to `old` at `new` instead. A sentinel parent
    /// means `old` is the root.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: Option<NodeId>) {
        if parent.is_sentinel() {
            self.sentinel.root = new;
        } else if self.node(parent).left == Some(old) {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    /// Hangs the subtree `new` where `old` was attached. `old`'s own links are
    /// left untouched.
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.node(old).parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// Recomputes both cached bounds from the root.
    fn refresh_bounds(&mut self) {
        match self.sentinel.root {
            None => self.sentinel = Sentinel::empty(),
            Some(root) => {
                self.sentinel.leftmost = self.minimum(root);
                self.sentinel.rightmost = self.maximum(root);
            }
        }
    }
}

impl<V, X, C, A> RbTree<V, X, C, A>
where
    X: KeyExtractor<V>,
    C: Comparator<X::Key>,
    A: NodeAllocator<V>,
{
    fn key_at(&self, id: NodeId) -> &X::Key {
        self.key_extractor.key(&self.node(id).value)
    }

    /// Returns a cursor to a value whose key is equivalent to `key`, or the end
    /// cursor if there is none.
    ///
    /// With duplicate keys the hit is not necessarily the earliest inserted;
    /// use [`first_equal`](Self::first_equal) for that.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let tree: RbTree<i32> = [4, 8, 15].into_iter().collect();
    /// assert_eq!(tree.get(tree.find(&8)), Some(&8));
    /// assert_eq!(tree.find(&16), tree.end());
    /// ```
    pub fn find(&self, key: &X::Key) -> Cursor {
        let mut current = self.sentinel.root;
        while let Some(id) = current {
            let node = self.node(id);
            let node_key = self.key_extractor.key(&node.value);
            if self.comparator.less(key, node_key) {
                current = node.left;
            } else if self.comparator.less(node_key, key) {
                current = node.right;
            } else {
                return Cursor::new(id);
            }
        }
        self.end()
    }

    /// Returns `true` if some value has a key equivalent to `key`.
    #[inline]
    pub fn contains(&self, key: &X::Key) -> bool {
        !self.find(key).is_end()
    }

    /// Returns a cursor to the earliest-inserted value whose key is equivalent
    /// to `key`, or the end cursor if there is none.
    pub fn first_equal(&self, key: &X::Key) -> Cursor {
        let mut first = self.find(key);
        if first.is_end() {
            return first;
        }
        loop {
            let previous = self.prev(first);
            if previous.is_end() || !self.comparator.equivalent(self.key_at(previous.node()), key)
            {
                return first;
            }
            first = previous;
        }
    }

    /// Returns the number of values whose key is equivalent to `key`.
    pub fn count(&self, key: &X::Key) -> usize {
        let mut cursor = self.first_equal(key);
        let mut count = 0;
        while !cursor.is_end() && self.comparator.equivalent(self.key_at(cursor.node()), key) {
            count += 1;
            cursor = self.next(cursor);
        }
        count
    }

    /// Inserts `value` and returns a cursor to its node.
    ///
    /// Equal keys are never merged: a value whose key is equivalent to existing
    /// keys lands after all of them in iteration order.
    ///
    /// # Errors
    ///
    /// Returns the allocator's [`AllocationError`] if no node could be
    /// allocated. The tree is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let mut tree: RbTree<(i32, char), ordtree::ordering::First> = RbTree::new();
    /// tree.insert((1, 'a')).unwrap();
    /// tree.insert((1, 'b')).unwrap();
    /// let tags: Vec<char> = tree.iter().map(|(_, tag)| *tag).collect();
    /// assert_eq!(tags, vec!['a', 'b']);
    /// ```
    pub fn insert(&mut self, value: V) -> Result<Cursor, AllocationError> {
        let mut parent = NodeId::SENTINEL;
        let mut side = Side::Left;
        let mut current = self.sentinel.root;
        while let Some(candidate) = current {
            parent = candidate;
            if self
                .comparator
                .less(self.key_extractor.key(&value), self.key_at(candidate))
            {
                side = Side::Left;
                current = self.node(candidate).left;
            } else {
                side = Side::Right;
                current = self.node(candidate).right;
            }
        }

        // Reserve after the descent; the comparator may panic.
        let id = self.allocator.allocate()?;
        let mut node = Node::new_red(value);
        node.parent = parent;
        self.allocator.construct(id, node);
        self.length += 1;

        if parent.is_sentinel() {
            #[cfg(feature = "tracing")]
            tracing::trace!(node = %id, "RbTree: new root");

            self.node_mut(id).color = Color::Black;
            self.sentinel = Sentinel {
                root: Some(id),
                leftmost: id,
                rightmost: id,
            };
            return Ok(Cursor::new(id));
        }

        self.node_mut(parent).set_child(side, Some(id));
        if side == Side::Left && parent == self.sentinel.leftmost {
            self.sentinel.leftmost = id;
        } else if side == Side::Right && parent == self.sentinel.rightmost {
            self.sentinel.rightmost = id;
        }

        self.insert_fixup(id);
        Ok(Cursor::new(id))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V, X: Default, C: Default, A: Default> Default for RbTree<V, X, C, A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V, X, C, A> Extend<V> for RbTree<V, X, C, A>
where
    X: KeyExtractor<V>,
    C: Comparator<X::Key>,
    A: NodeAllocator<V>,
{
    /// # Panics
    ///
    /// Panics if the allocator fails, like `Vec` does when it cannot grow.
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            if let Err(error) = self.insert(value) {
                panic!("RbTree::extend: {error}");
            }
        }
    }
}

impl<V, X, C, A> FromIterator<V> for RbTree<V, X, C, A>
where
    X: KeyExtractor<V> + Default,
    C: Comparator<X::Key> + Default,
    A: NodeAllocator<V> + Default,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<V: fmt::Debug, X, C, A: NodeAllocator<V>> fmt::Debug for RbTree<V, X, C, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

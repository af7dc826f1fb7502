use std::iter::FusedIterator;

use super::{Cursor, NodeAllocator, RbTree};

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A borrowing iterator over the values of an [`RbTree`] in order.
///
/// Driven by cursor stepping, so it needs no auxiliary stack.
pub struct Iter<'a, V, X, C, A> {
    tree: &'a RbTree<V, X, C, A>,
    front: Cursor,
    back: Cursor,
    remaining: usize,
}

impl<'a, V, X, C, A: NodeAllocator<V>> Iterator for Iter<'a, V, X, C, A> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.tree.get(self.front)?;
        self.front = self.tree.next(self.front);
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, X, C, A: NodeAllocator<V>> DoubleEndedIterator for Iter<'_, V, X, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.tree.get(self.back)?;
        self.back = self.tree.prev(self.back);
        self.remaining -= 1;
        Some(value)
    }
}

impl<V, X, C, A: NodeAllocator<V>> ExactSizeIterator for Iter<'_, V, X, C, A> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V, X, C, A: NodeAllocator<V>> FusedIterator for Iter<'_, V, X, C, A> {}

impl<V, X, C, A> Clone for Iter<'_, V, X, C, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// An owning iterator over the values of an [`RbTree`] in order.
///
/// Each step erases the current minimum (or maximum, from the back).
pub struct IntoIter<V, X, C, A> {
    tree: RbTree<V, X, C, A>,
}

impl<V, X, C, A: NodeAllocator<V>> Iterator for IntoIter<V, X, C, A> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.tree.is_empty() {
            return None;
        }
        let first = self.tree.begin();
        Some(self.tree.erase(first))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<V, X, C, A: NodeAllocator<V>> DoubleEndedIterator for IntoIter<V, X, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.tree.is_empty() {
            return None;
        }
        let last = self.tree.prev(self.tree.end());
        Some(self.tree.erase(last))
    }
}

impl<V, X, C, A: NodeAllocator<V>> ExactSizeIterator for IntoIter<V, X, C, A> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<V, X, C, A: NodeAllocator<V>> FusedIterator for IntoIter<V, X, C, A> {}

impl<V, X, C, A: NodeAllocator<V>> RbTree<V, X, C, A> {
    /// Returns an iterator over the values in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let tree: RbTree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V, X, C, A> {
        Iter {
            tree: self,
            front: self.begin(),
            back: Cursor::new(self.sentinel.rightmost),
            remaining: self.length,
        }
    }
}

impl<V, X, C, A: NodeAllocator<V>> IntoIterator for RbTree<V, X, C, A> {
    type Item = V;
    type IntoIter = IntoIter<V, X, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}

impl<'a, V, X, C, A: NodeAllocator<V>> IntoIterator for &'a RbTree<V, X, C, A> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V, X, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

use std::fmt;

use crate::error::AllocationError;
use crate::ordering::{Comparator, Identity, NaturalOrder};
use crate::tree::{Cursor, IntoIter, Iter, NodeAllocator, PoolAllocator, RbTree};

/// An ordered multiset: equivalent values are all kept, in insertion order.
///
/// # Examples
///
/// ```rust
/// use ordtree::containers::OrderedMultiSet;
///
/// let mut bag = OrderedMultiSet::new();
/// for value in [5, 3, 5, 1, 5] {
///     bag.insert(value).unwrap();
/// }
/// assert_eq!(bag.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 5, 5]);
/// assert_eq!(bag.count(&5), 3);
/// assert_eq!(bag.remove_all(&5), 3);
/// assert_eq!(bag.len(), 2);
/// ```
#[derive(Clone)]
pub struct OrderedMultiSet<T, C = NaturalOrder, A = PoolAllocator<T>> {
    tree: RbTree<T, Identity, C, A>,
}

impl<T> OrderedMultiSet<T> {
    /// Creates an empty multiset in natural order.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator_and_allocator(NaturalOrder, PoolAllocator::new())
    }
}

impl<T, C> OrderedMultiSet<T, C> {
    /// Creates an empty multiset ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_allocator(comparator, PoolAllocator::new())
    }
}

impl<T, C, A> OrderedMultiSet<T, C, A> {
    /// Creates an empty multiset from a comparator and a node allocator.
    #[inline]
    #[must_use]
    pub const fn with_comparator_and_allocator(comparator: C, allocator: A) -> Self {
        Self {
            tree: RbTree::with_parts(Identity, comparator, allocator),
        }
    }

    /// Returns the number of values, counting duplicates.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the underlying tree.
    #[inline]
    #[must_use]
    pub const fn as_tree(&self) -> &RbTree<T, Identity, C, A> {
        &self.tree
    }
}

impl<T, C, A: NodeAllocator<T>> OrderedMultiSet<T, C, A> {
    /// Returns the value at `cursor`.
    #[inline]
    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        self.tree.get(cursor)
    }

    /// Removes the single value at `cursor` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end cursor or no longer names a value.
    #[inline]
    pub fn erase(&mut self, cursor: Cursor) -> T {
        self.tree.erase(cursor)
    }

    /// Returns an iterator over the values in order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, Identity, C, A> {
        self.tree.iter()
    }

    /// Removes every value.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<T, C: Comparator<T>, A: NodeAllocator<T>> OrderedMultiSet<T, C, A> {
    /// Inserts `value` after every equivalent value already present.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if the node could not be allocated.
    #[inline]
    pub fn insert(&mut self, value: T) -> Result<Cursor, AllocationError> {
        self.tree.insert(value)
    }

    /// Returns a cursor to the earliest-inserted value equivalent to `value`,
    /// or the end cursor. Stepping forward from it visits the rest of the run.
    #[inline]
    pub fn find(&self, value: &T) -> Cursor {
        self.tree.first_equal(value)
    }

    /// Returns `true` if some value is equivalent to `value`.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Returns the number of values equivalent to `value`.
    #[inline]
    pub fn count(&self, value: &T) -> usize {
        self.tree.count(value)
    }

    /// Removes every value equivalent to `value` and returns how many were
    /// removed.
    pub fn remove_all(&mut self, value: &T) -> usize {
        let mut removed = 0;
        loop {
            let cursor = self.tree.find(value);
            if cursor.is_end() {
                return removed;
            }
            self.tree.erase(cursor);
            removed += 1;
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C: Default, A: Default> Default for OrderedMultiSet<T, C, A> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator_and_allocator(C::default(), A::default())
    }
}

impl<T: fmt::Debug, C, A: NodeAllocator<T>> fmt::Debug for OrderedMultiSet<T, C, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, A: NodeAllocator<T>> PartialEq for OrderedMultiSet<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C, A: NodeAllocator<T>> Eq for OrderedMultiSet<T, C, A> {}

impl<T, C: Comparator<T>, A: NodeAllocator<T>> Extend<T> for OrderedMultiSet<T, C, A> {
    /// # Panics
    ///
    /// Panics if the allocator fails.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<T, C, A> FromIterator<T> for OrderedMultiSet<T, C, A>
where
    C: Comparator<T> + Default,
    A: NodeAllocator<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Self::default();
        multiset.extend(iter);
        multiset
    }
}

impl<T, C, A: NodeAllocator<T>> IntoIterator for OrderedMultiSet<T, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T, Identity, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, T, C, A: NodeAllocator<T>> IntoIterator for &'a OrderedMultiSet<T, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, Identity, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T, C, A> serde::Serialize for OrderedMultiSet<T, C, A>
where
    T: serde::Serialize,
    A: NodeAllocator<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct OrderedMultiSetVisitor<T, C, A> {
    multiset_marker: std::marker::PhantomData<OrderedMultiSet<T, C, A>>,
}

#[cfg(feature = "serde")]
impl<'de, T, C, A> serde::de::Visitor<'de> for OrderedMultiSetVisitor<T, C, A>
where
    T: serde::Deserialize<'de>,
    C: Comparator<T> + Default,
    A: NodeAllocator<T> + Default,
{
    type Value = OrderedMultiSet<T, C, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<S>(self, mut access: S) -> Result<Self::Value, S::Error>
    where
        S: serde::de::SeqAccess<'de>,
    {
        let mut multiset = OrderedMultiSet::default();
        while let Some(value) = access.next_element()? {
            multiset.insert(value).map_err(serde::de::Error::custom)?;
        }
        Ok(multiset)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C, A> serde::Deserialize<'de> for OrderedMultiSet<T, C, A>
where
    T: serde::Deserialize<'de>,
    C: Comparator<T> + Default,
    A: NodeAllocator<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedMultiSetVisitor {
            multiset_marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

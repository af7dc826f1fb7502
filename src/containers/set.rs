use std::fmt;

use crate::error::AllocationError;
use crate::ordering::{Comparator, Identity, NaturalOrder};
use crate::tree::{Cursor, IntoIter, Iter, NodeAllocator, PoolAllocator, RbTree};

/// An ordered set of unique values.
///
/// Inserting a value equivalent to one already present leaves the set
/// unchanged and reports the existing position.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `insert`   | O(log N)   |
/// | `find`     | O(log N)   |
/// | `remove`   | O(log N)   |
/// | `erase`    | O(log N)   |
/// | `len`      | O(1)       |
///
/// # Examples
///
/// ```rust
/// use ordtree::containers::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// assert!(set.insert(3).unwrap().1);
/// assert!(set.insert(1).unwrap().1);
/// assert!(!set.insert(3).unwrap().1);
///
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
/// assert_eq!(set.remove(&1), Some(1));
/// assert!(!set.contains(&1));
/// ```
#[derive(Clone)]
pub struct OrderedSet<T, C = NaturalOrder, A = PoolAllocator<T>> {
    tree: RbTree<T, Identity, C, A>,
}

impl<T> OrderedSet<T> {
    /// Creates an empty set in natural order.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator_and_allocator(NaturalOrder, PoolAllocator::new())
    }
}

impl<T, C> OrderedSet<T, C> {
    /// Creates an empty set ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::containers::OrderedSet;
    /// use ordtree::ordering::ReverseOrder;
    ///
    /// let mut set = OrderedSet::with_comparator(ReverseOrder);
    /// set.extend([1, 3, 2]);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_allocator(comparator, PoolAllocator::new())
    }
}

impl<T, C, A> OrderedSet<T, C, A> {
    /// Creates an empty set from a comparator and a node allocator.
    #[inline]
    #[must_use]
    pub const fn with_comparator_and_allocator(comparator: C, allocator: A) -> Self {
        Self {
            tree: RbTree::with_parts(Identity, comparator, allocator),
        }
    }

    /// Returns the number of values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the underlying tree, for cursor stepping.
    #[inline]
    #[must_use]
    pub const fn as_tree(&self) -> &RbTree<T, Identity, C, A> {
        &self.tree
    }
}

impl<T, C, A: NodeAllocator<T>> OrderedSet<T, C, A> {
    /// Returns the value at `cursor`.
    #[inline]
    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        self.tree.get(cursor)
    }

    /// Removes the value at `cursor` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end cursor or no longer names a value.
    #[inline]
    pub fn erase(&mut self, cursor: Cursor) -> T {
        self.tree.erase(cursor)
    }

    /// Returns the smallest value.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the largest value.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
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

impl<T, C: Comparator<T>, A: NodeAllocator<T>> OrderedSet<T, C, A> {
    /// Inserts `value` unless an equivalent value is present.
    ///
    /// Returns the cursor of the value now in the set and whether `value` was
    /// inserted. A rejected `value` is dropped.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if a new node was needed and could not
    /// be allocated.
    pub fn insert(&mut self, value: T) -> Result<(Cursor, bool), AllocationError> {
        let existing = self.tree.find(&value);
        if !existing.is_end() {
            return Ok((existing, false));
        }
        self.tree.insert(value).map(|cursor| (cursor, true))
    }

    /// Returns a cursor to the value equivalent to `value`, or the end cursor.
    #[inline]
    pub fn find(&self, value: &T) -> Cursor {
        self.tree.find(value)
    }

    /// Returns `true` if a value equivalent to `value` is present.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Removes the value equivalent to `value` and returns it.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let cursor = self.tree.find(value);
        if cursor.is_end() {
            None
        } else {
            Some(self.tree.erase(cursor))
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C: Default, A: Default> Default for OrderedSet<T, C, A> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator_and_allocator(C::default(), A::default())
    }
}

impl<T: fmt::Debug, C, A: NodeAllocator<T>> fmt::Debug for OrderedSet<T, C, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, A: NodeAllocator<T>> PartialEq for OrderedSet<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C, A: NodeAllocator<T>> Eq for OrderedSet<T, C, A> {}

impl<T, C: Comparator<T>, A: NodeAllocator<T>> Extend<T> for OrderedSet<T, C, A> {
    /// # Panics
    ///
    /// Panics if the allocator fails.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(error) = self.insert(value) {
                panic!("OrderedSet::extend: {error}");
            }
        }
    }
}

impl<T, C, A> FromIterator<T> for OrderedSet<T, C, A>
where
    C: Comparator<T> + Default,
    A: NodeAllocator<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, C, A: NodeAllocator<T>> IntoIterator for OrderedSet<T, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T, Identity, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, T, C, A: NodeAllocator<T>> IntoIterator for &'a OrderedSet<T, C, A> {
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
impl<T, C, A> serde::Serialize for OrderedSet<T, C, A>
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
struct OrderedSetVisitor<T, C, A> {
    set_marker: std::marker::PhantomData<OrderedSet<T, C, A>>,
}

#[cfg(feature = "serde")]
impl<'de, T, C, A> serde::de::Visitor<'de> for OrderedSetVisitor<T, C, A>
where
    T: serde::Deserialize<'de>,
    C: Comparator<T> + Default,
    A: NodeAllocator<T> + Default,
{
    type Value = OrderedSet<T, C, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<S>(self, mut access: S) -> Result<Self::Value, S::Error>
    where
        S: serde::de::SeqAccess<'de>,
    {
        let mut set = OrderedSet::default();
        while let Some(value) = access.next_element()? {
            set.insert(value).map_err(serde::de::Error::custom)?;
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C, A> serde::Deserialize<'de> for OrderedSet<T, C, A>
where
    T: serde::Deserialize<'de>,
    C: Comparator<T> + Default,
    A: NodeAllocator<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedSetVisitor {
            set_marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

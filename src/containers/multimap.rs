use std::fmt;

use super::MapIter;
use crate::error::AllocationError;
use crate::ordering::{Comparator, First, NaturalOrder};
use crate::tree::{Cursor, IntoIter, NodeAllocator, PoolAllocator, RbTree};

/// An ordered map that keeps every value inserted under a key.
///
/// Values sharing a key are iterated in the order they were inserted.
///
/// # Examples
///
/// ```rust
/// use ordtree::containers::OrderedMultiMap;
///
/// let mut log = OrderedMultiMap::new();
/// log.insert(2, "second").unwrap();
/// log.insert(1, "first").unwrap();
/// log.insert(2, "second again").unwrap();
///
/// assert_eq!(log.count(&2), 2);
/// assert_eq!(log.get_all(&2).collect::<Vec<_>>(), vec![&"second", &"second again"]);
/// ```
#[derive(Clone)]
pub struct OrderedMultiMap<K, T, C = NaturalOrder, A = PoolAllocator<(K, T)>> {
    tree: RbTree<(K, T), First, C, A>,
}

impl<K, T> OrderedMultiMap<K, T> {
    /// Creates an empty multimap in natural key order.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator_and_allocator(NaturalOrder, PoolAllocator::new())
    }
}

impl<K, T, C> OrderedMultiMap<K, T, C> {
    /// Creates an empty multimap whose keys are ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_allocator(comparator, PoolAllocator::new())
    }
}

impl<K, T, C, A> OrderedMultiMap<K, T, C, A> {
    /// Creates an empty multimap from a key comparator and a node allocator.
    #[inline]
    #[must_use]
    pub const fn with_comparator_and_allocator(comparator: C, allocator: A) -> Self {
        Self {
            tree: RbTree::with_parts(First, comparator, allocator),
        }
    }

    /// Returns the number of entries, counting every value under every key.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multimap holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the underlying tree of `(key, value)` pairs.
    #[inline]
    #[must_use]
    pub const fn as_tree(&self) -> &RbTree<(K, T), First, C, A> {
        &self.tree
    }
}

impl<K, T, C, A: NodeAllocator<(K, T)>> OrderedMultiMap<K, T, C, A> {
    /// Returns the entry at `cursor`.
    #[inline]
    pub fn entry_at(&self, cursor: Cursor) -> Option<(&K, &T)> {
        self.tree.get(cursor).map(|(key, value)| (key, value))
    }

    /// Removes the single entry at `cursor` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end cursor or no longer names an entry.
    #[inline]
    pub fn erase(&mut self, cursor: Cursor) -> (K, T) {
        self.tree.erase(cursor)
    }

    /// Returns an iterator over all entries in key order.
    #[inline]
    pub fn iter(&self) -> MapIter<'_, K, T, C, A> {
        MapIter {
            inner: self.tree.iter(),
        }
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, T, C, A> OrderedMultiMap<K, T, C, A>
where
    C: Comparator<K>,
    A: NodeAllocator<(K, T)>,
{
    /// Adds `value` under `key`, after any values already stored there.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if the node could not be allocated.
    #[inline]
    pub fn insert(&mut self, key: K, value: T) -> Result<Cursor, AllocationError> {
        self.tree.insert((key, value))
    }

    /// Returns a cursor to the first entry stored under `key`, or the end
    /// cursor.
    #[inline]
    pub fn find(&self, key: &K) -> Cursor {
        self.tree.first_equal(key)
    }

    /// Returns `true` if at least one entry is stored under `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns the number of entries stored under `key`.
    #[inline]
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Returns the values stored under `key` in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a K) -> impl Iterator<Item = &'a T> + 'a {
        let mut cursor = self.tree.first_equal(key);
        std::iter::from_fn(move || {
            let (stored, value) = self.tree.get(cursor)?;
            if !self.tree.comparator().equivalent(stored, key) {
                return None;
            }
            cursor = self.tree.next(cursor);
            Some(value)
        })
    }

    /// Removes every entry stored under `key` and returns how many were
    /// removed.
    pub fn remove_all(&mut self, key: &K) -> usize {
        let mut removed = 0;
        loop {
            let cursor = self.tree.find(key);
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

impl<K, T, C: Default, A: Default> Default for OrderedMultiMap<K, T, C, A> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator_and_allocator(C::default(), A::default())
    }
}

impl<K, T, C, A> fmt::Debug for OrderedMultiMap<K, T, C, A>
where
    K: fmt::Debug,
    T: fmt::Debug,
    A: NodeAllocator<(K, T)>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K, T, C, A> PartialEq for OrderedMultiMap<K, T, C, A>
where
    K: PartialEq,
    T: PartialEq,
    A: NodeAllocator<(K, T)>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, T: Eq, C, A: NodeAllocator<(K, T)>> Eq for OrderedMultiMap<K, T, C, A> {}

impl<K, T, C, A> Extend<(K, T)> for OrderedMultiMap<K, T, C, A>
where
    C: Comparator<K>,
    A: NodeAllocator<(K, T)>,
{
    /// # Panics
    ///
    /// Panics if the allocator fails.
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K, T, C, A> FromIterator<(K, T)> for OrderedMultiMap<K, T, C, A>
where
    C: Comparator<K> + Default,
    A: NodeAllocator<(K, T)> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut multimap = Self::default();
        multimap.extend(iter);
        multimap
    }
}

impl<K, T, C, A: NodeAllocator<(K, T)>> IntoIterator for OrderedMultiMap<K, T, C, A> {
    type Item = (K, T);
    type IntoIter = IntoIter<(K, T), First, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, T, C, A: NodeAllocator<(K, T)>> IntoIterator for &'a OrderedMultiMap<K, T, C, A> {
    type Item = (&'a K, &'a T);
    type IntoIter = MapIter<'a, K, T, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, T, C, A> serde::Serialize for OrderedMultiMap<K, T, C, A>
where
    K: serde::Serialize,
    T: serde::Serialize,
    A: NodeAllocator<(K, T)>,
{
    /// Serialized as a sequence of `[key, value]` pairs, since a key may repeat.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.tree.iter())
    }
}

#[cfg(feature = "serde")]
struct OrderedMultiMapVisitor<K, T, C, A> {
    multimap_marker: std::marker::PhantomData<OrderedMultiMap<K, T, C, A>>,
}

#[cfg(feature = "serde")]
impl<'de, K, T, C, A> serde::de::Visitor<'de> for OrderedMultiMapVisitor<K, T, C, A>
where
    K: serde::Deserialize<'de>,
    T: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
    A: NodeAllocator<(K, T)> + Default,
{
    type Value = OrderedMultiMap<K, T, C, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of key-value pairs")
    }

    fn visit_seq<S>(self, mut access: S) -> Result<Self::Value, S::Error>
    where
        S: serde::de::SeqAccess<'de>,
    {
        let mut multimap = OrderedMultiMap::default();
        while let Some((key, value)) = access.next_element()? {
            multimap
                .insert(key, value)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(multimap)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, T, C, A> serde::Deserialize<'de> for OrderedMultiMap<K, T, C, A>
where
    K: serde::Deserialize<'de>,
    T: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
    A: NodeAllocator<(K, T)> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedMultiMapVisitor {
            multimap_marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> OrderedMultiMap<&'static str, i32> {
        [("b", 1), ("a", 2), ("b", 3), ("c", 4), ("b", 5)]
            .into_iter()
            .collect()
    }

    #[rstest]
    fn test_values_of_one_key_keep_insertion_order() {
        let multimap = sample();
        assert_eq!(multimap.get_all(&"b").copied().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(multimap.count(&"b"), 3);
        assert_eq!(multimap.get_all(&"z").count(), 0);
    }

    #[rstest]
    fn test_iteration_is_grouped_by_key() {
        let keys: Vec<&str> = sample().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["a", "b", "b", "b", "c"]);
    }

    #[rstest]
    fn test_find_points_at_first_value_of_key() {
        let multimap = sample();
        let cursor = multimap.find(&"b");
        assert_eq!(multimap.entry_at(cursor), Some((&"b", &1)));
        assert!(multimap.find(&"q").is_end());
        assert!(multimap.contains_key(&"c"));
    }

    #[rstest]
    fn test_erase_one_entry_keeps_the_rest() {
        let mut multimap = sample();
        let cursor = multimap.find(&"b");
        let second = multimap.as_tree().next(cursor);
        assert_eq!(multimap.erase(second), ("b", 3));
        assert_eq!(multimap.get_all(&"b").copied().collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(multimap.entry_at(cursor), Some((&"b", &1)));
    }

    #[rstest]
    fn test_remove_all() {
        let mut multimap = sample();
        assert_eq!(multimap.remove_all(&"b"), 3);
        assert_eq!(multimap.len(), 2);
        assert!(multimap.as_tree().check_invariants().is_ok());
    }

    #[rstest]
    fn test_equality_depends_on_value_order_within_key() {
        let first: OrderedMultiMap<i32, i32> = [(1, 1), (1, 2)].into_iter().collect();
        let second: OrderedMultiMap<i32, i32> = [(1, 2), (1, 1)].into_iter().collect();
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[rstest]
    fn test_debug_lists_repeated_keys() {
        let multimap: OrderedMultiMap<i32, char> = [(1, 'x'), (1, 'y')].into_iter().collect();
        assert_eq!(format!("{multimap:?}"), "{1: 'x', 1: 'y'}");
    }

    #[rstest]
    fn test_clear() {
        let mut multimap = sample();
        multimap.clear();
        assert!(multimap.is_empty());
        assert_eq!(multimap.count(&"b"), 0);
    }
}

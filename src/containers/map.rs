use std::fmt;
use std::iter::FusedIterator;

use crate::error::AllocationError;
use crate::ordering::{Comparator, First, NaturalOrder};
use crate::tree::{Cursor, IntoIter, Iter, NodeAllocator, PoolAllocator, RbTree};

/// An ordered map with unique keys.
///
/// Entries are stored as `(key, value)` pairs ordered by key. Inserting a key
/// that is already present never replaces the stored value; use
/// [`get_mut`](Self::get_mut) for that.
///
/// # Time Complexity
///
/// | Operation               | Complexity |
/// |-------------------------|------------|
/// | `insert`                | O(log N)   |
/// | `get` / `get_mut`       | O(log N)   |
/// | `get_or_insert_default` | O(log N)   |
/// | `remove`                | O(log N)   |
/// | `len`                   | O(1)       |
///
/// # Examples
///
/// ```rust
/// use ordtree::containers::OrderedMap;
///
/// let mut scores = OrderedMap::new();
/// scores.insert("bob", 3).unwrap();
/// scores.insert("alice", 5).unwrap();
/// *scores.get_or_insert_default("carol").unwrap() += 1;
///
/// let entries: Vec<(&str, i32)> = scores.iter().map(|(name, score)| (*name, *score)).collect();
/// assert_eq!(entries, vec![("alice", 5), ("bob", 3), ("carol", 1)]);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, T, C = NaturalOrder, A = PoolAllocator<(K, T)>> {
    tree: RbTree<(K, T), First, C, A>,
}

impl<K, T> OrderedMap<K, T> {
    /// Creates an empty map in natural key order.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator_and_allocator(NaturalOrder, PoolAllocator::new())
    }
}

impl<K, T, C> OrderedMap<K, T, C> {
    /// Creates an empty map whose keys are ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_allocator(comparator, PoolAllocator::new())
    }
}

impl<K, T, C, A> OrderedMap<K, T, C, A> {
    /// Creates an empty map from a key comparator and a node allocator.
    #[inline]
    #[must_use]
    pub const fn with_comparator_and_allocator(comparator: C, allocator: A) -> Self {
        Self {
            tree: RbTree::with_parts(First, comparator, allocator),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map holds no entries.
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

impl<K, T, C, A: NodeAllocator<(K, T)>> OrderedMap<K, T, C, A> {
    /// Returns the entry at `cursor`.
    #[inline]
    pub fn entry_at(&self, cursor: Cursor) -> Option<(&K, &T)> {
        self.tree.get(cursor).map(|(key, value)| (key, value))
    }

    /// Removes the entry at `cursor` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end cursor or no longer names an entry.
    #[inline]
    pub fn erase(&mut self, cursor: Cursor) -> (K, T) {
        self.tree.erase(cursor)
    }

    /// Returns the entry with the smallest key.
    #[inline]
    pub fn first(&self) -> Option<(&K, &T)> {
        self.tree.first().map(|(key, value)| (key, value))
    }

    /// Returns the entry with the largest key.
    #[inline]
    pub fn last(&self) -> Option<(&K, &T)> {
        self.tree.last().map(|(key, value)| (key, value))
    }

    /// Returns an iterator over the entries in key order.
    #[inline]
    pub fn iter(&self) -> MapIter<'_, K, T, C, A> {
        MapIter {
            inner: self.tree.iter(),
        }
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, T, C, A> OrderedMap<K, T, C, A>
where
    C: Comparator<K>,
    A: NodeAllocator<(K, T)>,
{
    /// Inserts `value` under `key` unless `key` is already present.
    ///
    /// Returns the cursor of the entry for `key` and whether a new entry was
    /// created. An existing entry keeps its value; the rejected pair is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if a new node was needed and could not
    /// be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::containers::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert!(map.insert(1, "one").unwrap().1);
    /// assert!(!map.insert(1, "uno").unwrap().1);
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    pub fn insert(&mut self, key: K, value: T) -> Result<(Cursor, bool), AllocationError> {
        let existing = self.tree.find(&key);
        if !existing.is_end() {
            return Ok((existing, false));
        }
        self.tree.insert((key, value)).map(|cursor| (cursor, true))
    }

    /// Returns a cursor to the entry for `key`, or the end cursor.
    #[inline]
    pub fn find(&self, key: &K) -> Cursor {
        self.tree.find(key)
    }

    /// Returns `true` if the map has an entry for `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&T> {
        self.tree.get(self.tree.find(key)).map(|(_, value)| value)
    }

    /// Returns the value stored under `key` mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        let cursor = self.tree.find(key);
        self.tree.get_mut(cursor).map(|(_, value)| value)
    }

    /// Returns the value stored under `key`, inserting `T::default()` first if
    /// `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if the entry was absent and could not be
    /// allocated.
    pub fn get_or_insert_default(&mut self, key: K) -> Result<&mut T, AllocationError>
    where
        T: Default,
    {
        let mut cursor = self.tree.find(&key);
        if cursor.is_end() {
            cursor = self.tree.insert((key, T::default()))?;
        }
        match self.tree.get_mut(cursor) {
            Some((_, value)) => Ok(value),
            None => unreachable!("entry at {cursor:?} was just found or inserted"),
        }
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<T> {
        let cursor = self.tree.find(key);
        if cursor.is_end() {
            None
        } else {
            Some(self.tree.erase(cursor).1)
        }
    }
}

// =============================================================================
// MapIter
// =============================================================================

/// A borrowing iterator over the entries of a map in key order.
///
/// Shared by [`OrderedMap`] and
/// [`OrderedMultiMap`](crate::containers::OrderedMultiMap).
pub struct MapIter<'a, K, T, C, A> {
    pub(super) inner: Iter<'a, (K, T), First, C, A>,
}

impl<'a, K, T, C, A: NodeAllocator<(K, T)>> Iterator for MapIter<'a, K, T, C, A> {
    type Item = (&'a K, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, T, C, A: NodeAllocator<(K, T)>> DoubleEndedIterator for MapIter<'_, K, T, C, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, T, C, A: NodeAllocator<(K, T)>> ExactSizeIterator for MapIter<'_, K, T, C, A> {}

impl<K, T, C, A: NodeAllocator<(K, T)>> FusedIterator for MapIter<'_, K, T, C, A> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, T, C: Default, A: Default> Default for OrderedMap<K, T, C, A> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator_and_allocator(C::default(), A::default())
    }
}

impl<K, T, C, A> fmt::Debug for OrderedMap<K, T, C, A>
where
    K: fmt::Debug,
    T: fmt::Debug,
    A: NodeAllocator<(K, T)>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K, T, C, A> PartialEq for OrderedMap<K, T, C, A>
where
    K: PartialEq,
    T: PartialEq,
    A: NodeAllocator<(K, T)>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, T: Eq, C, A: NodeAllocator<(K, T)>> Eq for OrderedMap<K, T, C, A> {}

impl<K, T, C, A> Extend<(K, T)> for OrderedMap<K, T, C, A>
where
    C: Comparator<K>,
    A: NodeAllocator<(K, T)>,
{
    /// Inserts each pair; pairs whose key is already present are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the allocator fails.
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(error) = self.insert(key, value) {
                panic!("OrderedMap::extend: {error}");
            }
        }
    }
}

impl<K, T, C, A> FromIterator<(K, T)> for OrderedMap<K, T, C, A>
where
    C: Comparator<K> + Default,
    A: NodeAllocator<(K, T)> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, T, C, A: NodeAllocator<(K, T)>> IntoIterator for OrderedMap<K, T, C, A> {
    type Item = (K, T);
    type IntoIter = IntoIter<(K, T), First, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, T, C, A: NodeAllocator<(K, T)>> IntoIterator for &'a OrderedMap<K, T, C, A> {
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
impl<K, T, C, A> serde::Serialize for OrderedMap<K, T, C, A>
where
    K: serde::Serialize,
    T: serde::Serialize,
    A: NodeAllocator<(K, T)>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedMapVisitor<K, T, C, A> {
    map_marker: std::marker::PhantomData<OrderedMap<K, T, C, A>>,
}

#[cfg(feature = "serde")]
impl<'de, K, T, C, A> serde::de::Visitor<'de> for OrderedMapVisitor<K, T, C, A>
where
    K: serde::Deserialize<'de>,
    T: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
    A: NodeAllocator<(K, T)> + Default,
{
    type Value = OrderedMap<K, T, C, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: serde::de::MapAccess<'de>,
    {
        // A repeated key keeps its first value, like `insert`.
        let mut map = OrderedMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value).map_err(serde::de::Error::custom)?;
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, T, C, A> serde::Deserialize<'de> for OrderedMap<K, T, C, A>
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
        deserializer.deserialize_map(OrderedMapVisitor {
            map_marker: std::marker::PhantomData,
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

    fn sample() -> OrderedMap<i32, &'static str> {
        [(2, "two"), (1, "one"), (3, "three")].into_iter().collect()
    }

    #[rstest]
    fn test_insert_never_overwrites() {
        let mut map = OrderedMap::new();
        let (cursor, inserted) = map.insert("k", 1).unwrap();
        assert!(inserted);
        let (again, inserted) = map.insert("k", 2).unwrap();
        assert!(!inserted);
        assert_eq!(cursor, again);
        assert_eq!(map.get(&"k"), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[rstest]
    fn test_get_mut_updates_in_place() {
        let mut map = sample();
        if let Some(value) = map.get_mut(&2) {
            *value = "deux";
        }
        assert_eq!(map.get(&2), Some(&"deux"));
        assert_eq!(map.get_mut(&9), None);
    }

    #[rstest]
    fn test_get_or_insert_default_inserts_once() {
        let mut counts: OrderedMap<char, usize> = OrderedMap::new();
        for letter in "banana".chars() {
            *counts.get_or_insert_default(letter).unwrap() += 1;
        }
        let collected: Vec<(char, usize)> = counts.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(collected, vec![('a', 3), ('b', 1), ('n', 2)]);
    }

    #[rstest]
    fn test_get_or_insert_default_reports_allocation_failure() {
        let mut map: OrderedMap<i32, i32, NaturalOrder, PoolAllocator<(i32, i32)>> =
            OrderedMap::with_comparator_and_allocator(
                NaturalOrder,
                PoolAllocator::with_node_limit(1),
            );
        *map.get_or_insert_default(1).unwrap() = 10;
        assert_eq!(map.get_or_insert_default(1).copied(), Ok(10));
        assert_eq!(
            map.get_or_insert_default(2).copied(),
            Err(AllocationError::CapacityExhausted { limit: 1 })
        );
    }

    #[rstest]
    fn test_remove_and_erase() {
        let mut map = sample();
        assert_eq!(map.remove(&1), Some("one"));
        assert_eq!(map.remove(&1), None);
        let cursor = map.find(&3);
        assert_eq!(map.entry_at(cursor), Some((&3, &"three")));
        assert_eq!(map.erase(cursor), (3, "three"));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[rstest]
    fn test_keys_and_values_follow_key_order() {
        let map = sample();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            map.values().rev().copied().collect::<Vec<_>>(),
            vec!["three", "two", "one"]
        );
        assert_eq!(map.first(), Some((&1, &"one")));
        assert_eq!(map.last(), Some((&3, &"three")));
    }

    #[rstest]
    fn test_contains_key() {
        let map = sample();
        assert!(map.contains_key(&2));
        assert!(!map.contains_key(&4));
        assert!(map.find(&4).is_end());
    }

    #[rstest]
    fn test_from_iter_keeps_first_value_for_repeated_key() {
        let map: OrderedMap<i32, char> = [(1, 'a'), (1, 'b')].into_iter().collect();
        assert_eq!(map.get(&1), Some(&'a'));
    }

    #[rstest]
    fn test_debug_uses_map_notation() {
        let map = sample();
        assert_eq!(
            format!("{map:?}"),
            r#"{1: "one", 2: "two", 3: "three"}"#
        );
    }

    #[rstest]
    fn test_equality_and_clone() {
        let map = sample();
        let mut copy = map.clone();
        assert_eq!(map, copy);
        copy.remove(&2);
        assert_ne!(map, copy);
    }

    #[rstest]
    fn test_owned_into_iter_yields_pairs() {
        let pairs: Vec<(i32, &str)> = sample().into_iter().collect();
        assert_eq!(pairs, vec![(1, "one"), (2, "two"), (3, "three")]);
    }

    #[rstest]
    fn test_clear() {
        let mut map = sample();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&1), None);
    }
}

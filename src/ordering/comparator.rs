use std::fmt;

/// A strict weak ordering over keys.
///
/// Implementations must be irreflexive, asymmetric and transitive, and
/// equivalence (`!less(a, b) && !less(b, a)`) must be transitive. The tree's
/// ordering and balance guarantees only hold for comparators that satisfy
/// these laws.
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `left` sorts strictly before `right`.
    fn less(&self, left: &K, right: &K) -> bool;

    /// Returns `true` if neither key sorts before the other.
    #[inline]
    fn equivalent(&self, left: &K, right: &K) -> bool {
        !self.less(left, right) && !self.less(right, left)
    }
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left < right
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        right < left
    }
}

/// Adapts a closure `Fn(&K, &K) -> bool` into a [`Comparator`].
///
/// # Examples
///
/// ```rust
/// use ordtree::ordering::{Comparator, FnComparator};
///
/// let by_length = FnComparator::new(|left: &&str, right: &&str| left.len() < right.len());
/// assert!(by_length.less(&"ab", &"abc"));
/// assert!(by_length.equivalent(&"ab", &"cd"));
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnComparator<F> {
    function: F,
}

impl<F> FnComparator<F> {
    /// Wraps `function`, which must implement a strict weak ordering.
    #[inline]
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

impl<K: ?Sized, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        (self.function)(left, right)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FnComparator").finish_non_exhaustive()
    }
}

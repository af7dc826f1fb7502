/// Derives the ordering key from a stored value.
///
/// Sets store their keys directly ([`Identity`]); maps store `(key, mapped)`
/// pairs and order by the first component ([`First`]).
pub trait KeyExtractor<V> {
    /// The key type the comparator works on.
    type Key: ?Sized;

    /// Returns the key of `value`.
    fn key<'a>(&self, value: &'a V) -> &'a Self::Key;
}

/// Uses the whole value as its key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Identity;

impl<V> KeyExtractor<V> for Identity {
    type Key = V;

    #[inline]
    fn key<'a>(&self, value: &'a V) -> &'a V {
        value
    }
}

/// Uses the first component of a pair as its key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct First;

impl<K, T> KeyExtractor<(K, T)> for First {
    type Key = K;

    #[inline]
    fn key<'a>(&self, value: &'a (K, T)) -> &'a K {
        &value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_identity_returns_value() {
        let value = String::from("key");
        assert_eq!(Identity.key(&value), "key");
    }

    #[rstest]
    fn test_first_returns_first_component() {
        let entry = ("key", 42);
        assert_eq!(First.key(&entry), &"key");
    }
}

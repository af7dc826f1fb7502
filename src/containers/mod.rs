//! Ordered containers built on [`RbTree`](crate::tree::RbTree).
//!
//! The tree engine never merges equal keys; each container decides whether a
//! duplicate is admitted:
//!
//! | Container           | Stored value | Duplicate keys           |
//! |---------------------|--------------|--------------------------|
//! | [`OrderedSet`]      | `T`          | rejected                 |
//! | [`OrderedMap`]      | `(K, T)`     | rejected, never replaced |
//! | [`OrderedMultiSet`] | `T`          | kept in insertion order  |
//! | [`OrderedMultiMap`] | `(K, T)`     | kept in insertion order  |
//!
//! All four hand out [`Cursor`](crate::tree::Cursor)s from their lookups and
//! accept them back in `erase`, with the same rules as the tree: erasing a
//! node only invalidates cursors to that node.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::containers::{OrderedMap, OrderedMultiSet};
//!
//! let mut map = OrderedMap::new();
//! map.insert("b", 2).unwrap();
//! map.insert("a", 1).unwrap();
//! let (_, inserted) = map.insert("a", 100).unwrap();
//! assert!(!inserted);
//! assert_eq!(map.get(&"a"), Some(&1));
//!
//! let bag: OrderedMultiSet<i32> = [3, 1, 3].into_iter().collect();
//! assert_eq!(bag.count(&3), 2);
//! ```

mod map;
mod multimap;
mod multiset;
mod set;

pub use map::MapIter;
pub use map::OrderedMap;
pub use multimap::OrderedMultiMap;
pub use multiset::OrderedMultiSet;
pub use set::OrderedSet;

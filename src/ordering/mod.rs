//! Ordering collaborators consumed by the tree engine.
//!
//! The engine never looks at stored values directly. It asks a
//! [`KeyExtractor`] for the key of a value and a [`Comparator`] whether one key
//! sorts strictly before another.
//!
//! - [`Identity`] and [`First`] cover the set and map layouts.
//! - [`NaturalOrder`], [`ReverseOrder`] and [`FnComparator`] cover the common
//!   comparators.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::ordering::{Comparator, First, KeyExtractor, ReverseOrder};
//!
//! let entry = (7, "seven");
//! assert_eq!(First.key(&entry), &7);
//! assert!(ReverseOrder.less(&9, &7));
//! ```

mod comparator;
mod key;

pub use comparator::Comparator;
pub use comparator::FnComparator;
pub use comparator::NaturalOrder;
pub use comparator::ReverseOrder;
pub use key::First;
pub use key::Identity;
pub use key::KeyExtractor;

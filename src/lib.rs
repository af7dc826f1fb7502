//! # ordtree
//!
//! A red-black tree engine with cursors, and the ordered containers built on
//! top of it.
//!
//! ## Overview
//!
//! - **Tree engine**: [`tree::RbTree`], a red-black tree anchored on a single
//!   sentinel that is both the end position and the cache of the minimum and
//!   maximum nodes. Positions are [`tree::Cursor`] handles that survive
//!   unrelated insertions and erasures.
//! - **Ordering**: pluggable comparators and key extractors in [`ordering`].
//! - **Node storage**: a [`tree::NodeAllocator`] trait with a pooled default
//!   that reuses freed slots and can be capped.
//! - **Containers**: set, map, multiset and multimap wrappers that decide
//!   whether equal keys are admitted.
//!
//! ## Feature Flags
//!
//! - `tree`: the tree engine, orderings and errors
//! - `containers`: the four wrapper containers
//! - `serde`: `Serialize`/`Deserialize` for the containers
//! - `tracing`: structural trace events from the engine
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use ordtree::prelude::*;
//!
//! let mut tree: RbTree<i32> = RbTree::new();
//! for value in [5, 3, 5, 1, 5] {
//!     tree.insert(value).unwrap();
//! }
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 5, 5]);
//!
//! let mut set = OrderedSet::new();
//! set.extend([5, 3, 5, 1, 5]);
//! assert_eq!(set.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use ordtree::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "tree")]
    pub use crate::error::*;

    #[cfg(feature = "tree")]
    pub use crate::ordering::*;

    #[cfg(feature = "tree")]
    pub use crate::tree::*;

    #[cfg(feature = "containers")]
    pub use crate::containers::*;
}

#[cfg(feature = "tree")]
pub mod error;

#[cfg(feature = "tree")]
pub mod ordering;

#[cfg(feature = "tree")]
pub mod tree;

#[cfg(feature = "containers")]
pub mod containers;

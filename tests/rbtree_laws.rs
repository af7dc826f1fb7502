#![cfg(feature = "tree")]
//! Property-based tests for the red-black tree engine.
//!
//! ## Structural Laws
//!
//! 1. **Sorted order**: an in-order walk yields keys in non-decreasing order
//! 2. **Stable duplicates**: equal keys are visited in insertion order
//! 3. **Round trip**: `prev(next(c)) == c` and `next(prev(c)) == c`
//! 4. **Balance**: the checker accepts the tree after every insert and erase
//! 5. **Count coherence**: `len()` equals the number of values iterated
//! 6. **Empty convergence**: erasing everything leaves `begin() == end()`
//! 7. **Cache correctness**: `begin()` and `prev(end())` name the minimum and
//!    maximum keys

use std::collections::BTreeMap;

use ordtree::ordering::{First, Identity, NaturalOrder};
use ordtree::tree::{Cursor, PoolAllocator, RbTree};
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Clone, Debug)]
enum Operation {
    Insert(i16),
    /// Erase the value at this position of the current in-order sequence,
    /// taken modulo the length.
    EraseAt(usize),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => any::<i16>().prop_map(|value| Operation::Insert(value % 64)),
        2 => any::<usize>().prop_map(Operation::EraseAt),
    ]
}

fn cursor_at(tree: &RbTree<i16>, position: usize) -> Cursor {
    let mut cursor = tree.begin();
    for _ in 0..position {
        cursor = tree.next(cursor);
    }
    cursor
}

fn assert_bounds(tree: &RbTree<i16>) -> Result<(), TestCaseError> {
    prop_assert_eq!(tree.get(tree.begin()), tree.iter().next());
    prop_assert_eq!(tree.get(tree.prev(tree.end())), tree.iter().next_back());
    Ok(())
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: in-order iteration matches a sorted copy of the input.
    #[test]
    fn prop_iteration_is_sorted(values in prop::collection::vec(any::<i32>(), 0..200)) {
        let tree: RbTree<i32> = values.iter().copied().collect();
        let mut expected = values;
        expected.sort_unstable();
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
    }

    /// Law: values with equal keys keep their insertion order.
    #[test]
    fn prop_duplicates_are_stable(keys in prop::collection::vec(0u8..8, 0..120)) {
        let mut tree: RbTree<(u8, usize), First> = RbTree::new();
        for (position, key) in keys.iter().enumerate() {
            tree.insert((*key, position)).unwrap();
        }
        let mut expected: Vec<(u8, usize)> = keys.into_iter().enumerate().map(|(p, k)| (k, p)).collect();
        // A stable sort by key alone is exactly insertion order within a key.
        expected.sort_by_key(|(key, _)| *key);
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
    }

    /// Law: `first_equal` starts the run of a key and `count` measures it.
    #[test]
    fn prop_equal_run_helpers(keys in prop::collection::vec(0u8..6, 1..80), probe in 0u8..6) {
        let mut tree: RbTree<(u8, usize), First> = RbTree::new();
        for (position, key) in keys.iter().enumerate() {
            tree.insert((*key, position)).unwrap();
        }
        let expected = keys.iter().filter(|key| **key == probe).count();
        prop_assert_eq!(tree.count(&probe), expected);

        let first = tree.first_equal(&probe);
        match keys.iter().position(|key| *key == probe) {
            Some(position) => prop_assert_eq!(tree.get(first), Some(&(probe, position))),
            None => prop_assert!(first.is_end()),
        }
    }
}

// =============================================================================
// Cursor Laws
// =============================================================================

proptest! {
    /// Law: stepping forward then back (and back then forward) is the identity.
    #[test]
    fn prop_cursor_round_trip(values in prop::collection::vec(any::<i16>(), 1..100)) {
        let tree: RbTree<i16> = values.into_iter().collect();
        let mut cursor = tree.begin();
        while !cursor.is_end() {
            prop_assert_eq!(tree.prev(tree.next(cursor)), cursor);
            if cursor != tree.begin() {
                prop_assert_eq!(tree.next(tree.prev(cursor)), cursor);
            }
            cursor = tree.next(cursor);
        }
    }

    /// Law: the backward walk is the reverse of the forward walk.
    #[test]
    fn prop_backward_walk_reverses_forward_walk(values in prop::collection::vec(any::<i16>(), 0..100)) {
        let tree: RbTree<i16> = values.into_iter().collect();
        let mut backward = Vec::new();
        let mut cursor = tree.prev(tree.end());
        while !cursor.is_end() {
            backward.push(*tree.get(cursor).unwrap());
            cursor = tree.prev(cursor);
        }
        backward.reverse();
        prop_assert_eq!(backward, tree.iter().copied().collect::<Vec<_>>());
    }
}

// =============================================================================
// Balance and Bookkeeping Laws
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Law: a randomized mix of at least a thousand inserts and erases keeps
    /// every invariant, the count, and the bound cache correct at every step,
    /// and agrees with a `BTreeMap` multiset model.
    #[test]
    fn prop_random_operations_keep_invariants(
        operations in prop::collection::vec(operation(), 1000..1200)
    ) {
        let mut tree: RbTree<i16> = RbTree::new();
        let mut model: BTreeMap<i16, usize> = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(value) => {
                    tree.insert(value).unwrap();
                    *model.entry(value).or_default() += 1;
                }
                Operation::EraseAt(position) => {
                    if tree.is_empty() {
                        continue;
                    }
                    let erased = tree.erase(cursor_at(&tree, position % tree.len()));
                    let remaining = model.get_mut(&erased).unwrap();
                    *remaining -= 1;
                    if *remaining == 0 {
                        model.remove(&erased);
                    }
                }
            }
            prop_assert!(tree.check_invariants().is_ok());
            prop_assert_eq!(tree.len(), tree.iter().count());
            assert_bounds(&tree)?;
        }

        let expected: Vec<i16> = model
            .iter()
            .flat_map(|(value, count)| std::iter::repeat_n(*value, *count))
            .collect();
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
    }

    /// Law: inserting `1..=n` and erasing every key in any order empties the
    /// tree, after which every erased key is absent.
    #[test]
    fn prop_erase_all_converges_to_empty(
        order in (1usize..200).prop_flat_map(|n| Just((1..=n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let mut tree: RbTree<usize> = (1..=order.len()).collect();
        for key in &order {
            let cursor = tree.find(key);
            prop_assert!(!cursor.is_end());
            tree.erase(cursor);
            prop_assert!(tree.check_invariants().is_ok());
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.begin(), tree.end());
        for key in &order {
            prop_assert!(tree.find(key).is_end());
        }
    }

    /// Law: a capped pool fails inserts without disturbing the tree.
    #[test]
    fn prop_capped_pool_failure_is_harmless(
        values in prop::collection::vec(any::<i16>(), 0..60),
        limit in 0usize..30
    ) {
        let mut tree: RbTree<i16> =
            RbTree::with_parts(Identity, NaturalOrder, PoolAllocator::with_node_limit(limit));
        let mut accepted = Vec::new();
        for value in values {
            if tree.insert(value).is_ok() {
                accepted.push(value);
            }
        }
        prop_assert!(accepted.len() <= limit);
        accepted.sort_unstable();
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), accepted);
        prop_assert!(tree.check_invariants().is_ok());
    }
}

//! Error types for the tree engine and its containers.
//!
//! Two kinds of failure are recoverable values:
//!
//! - [`AllocationError`]: the node allocator could not provide a slot for a new
//!   node. Insertion propagates it unchanged and leaves the tree untouched.
//! - [`InvariantViolation`]: reported by
//!   [`RbTree::check_invariants`](crate::tree::RbTree::check_invariants) when
//!   the red-black structure is inconsistent.
//!
//! Looking up a missing key is not an error; lookups return the end cursor.
//! Misusing a cursor (erasing the end position or a node that was already
//! erased) is a contract violation and panics.

use std::collections::TryReserveError;

use crate::tree::NodeId;

/// Represents a failure of the node allocator to provide storage for a node.
///
/// # Examples
///
/// ```rust
/// use ordtree::error::AllocationError;
///
/// let error = AllocationError::CapacityExhausted { limit: 4 };
/// assert_eq!(
///     format!("{error}"),
///     "node allocator exhausted: limit of 4 nodes reached"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The allocator was configured with a node limit and every slot is in use.
    CapacityExhausted {
        /// The configured maximum number of live nodes.
        limit: usize,
    },
    /// The backing storage could not grow.
    OutOfMemory(TryReserveError),
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExhausted { limit } => write!(
                formatter,
                "node allocator exhausted: limit of {limit} nodes reached"
            ),
            Self::OutOfMemory(error) => write!(formatter, "node allocator out of memory: {error}"),
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CapacityExhausted { .. } => None,
            Self::OutOfMemory(error) => Some(error),
        }
    }
}

impl From<TryReserveError> for AllocationError {
    fn from(error: TryReserveError) -> Self {
        Self::OutOfMemory(error)
    }
}

/// Describes which red-black or bookkeeping invariant a tree failed.
///
/// Produced by the structural checker; a correctly used tree never yields one.
///
/// # Examples
///
/// ```rust
/// use ordtree::error::InvariantViolation;
///
/// let violation = InvariantViolation::Count { recorded: 3, counted: 2 };
/// assert_eq!(
///     format!("{violation}"),
///     "count mismatch: tree records 3 nodes but 2 are reachable"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root of a non-empty tree is red.
    RedRoot,
    /// A red node has a red child.
    RedRed {
        /// The red child of a red parent.
        node: NodeId,
    },
    /// Two subtrees of one node have different black heights.
    BlackHeight {
        /// The node whose subtrees disagree.
        node: NodeId,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A node is out of order with respect to an ancestor.
    Order {
        /// The misplaced node.
        node: NodeId,
    },
    /// A child's parent link does not point back at its parent.
    ParentLink {
        /// The child with the broken back-reference.
        node: NodeId,
    },
    /// The sentinel's cached leftmost or rightmost node is wrong.
    BoundCache {
        /// What the sentinel caches.
        cached: NodeId,
        /// What a walk from the root finds.
        actual: NodeId,
    },
    /// A link names a node the allocator does not hold.
    DanglingLink {
        /// The handle that failed to resolve.
        node: NodeId,
    },
    /// The recorded length differs from the number of reachable nodes.
    Count {
        /// The length the tree reports.
        recorded: usize,
        /// The number of nodes reachable from the root.
        counted: usize,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root of a non-empty tree is red"),
            Self::RedRed { node } => write!(formatter, "red node {node} has a red parent"),
            Self::BlackHeight { node, left, right } => write!(
                formatter,
                "black height mismatch under {node}: left {left}, right {right}"
            ),
            Self::Order { node } => write!(formatter, "node {node} violates search order"),
            Self::ParentLink { node } => {
                write!(formatter, "node {node} has a parent link that does not match")
            }
            Self::BoundCache { cached, actual } => write!(
                formatter,
                "sentinel caches {cached} as a bound but the tree bound is {actual}"
            ),
            Self::DanglingLink { node } => {
                write!(formatter, "link to {node} does not resolve to a live node")
            }
            Self::Count { recorded, counted } => write!(
                formatter,
                "count mismatch: tree records {recorded} nodes but {counted} are reachable"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn try_reserve_error() -> TryReserveError {
        let mut buffer: Vec<u8> = Vec::new();
        match buffer.try_reserve(usize::MAX) {
            Err(error) => error,
            Ok(()) => unreachable!("reserving usize::MAX bytes cannot succeed"),
        }
    }

    #[rstest]
    fn test_capacity_exhausted_display() {
        let error = AllocationError::CapacityExhausted { limit: 16 };
        assert_eq!(
            format!("{error}"),
            "node allocator exhausted: limit of 16 nodes reached"
        );
    }

    #[rstest]
    fn test_out_of_memory_display_mentions_cause() {
        let error = AllocationError::from(try_reserve_error());
        assert!(format!("{error}").starts_with("node allocator out of memory: "));
    }

    #[rstest]
    fn test_capacity_exhausted_has_no_source() {
        use std::error::Error;

        let error = AllocationError::CapacityExhausted { limit: 1 };
        assert!(error.source().is_none());
    }

    #[rstest]
    fn test_out_of_memory_exposes_source() {
        use std::error::Error;

        let error = AllocationError::OutOfMemory(try_reserve_error());
        assert!(error.source().is_some());
    }

    #[rstest]
    fn test_allocation_error_equality() {
        let first = AllocationError::CapacityExhausted { limit: 2 };
        let second = AllocationError::CapacityExhausted { limit: 2 };
        let third = AllocationError::CapacityExhausted { limit: 3 };
        assert_eq!(first, second);
        assert_ne!(first, third);
    }

    #[rstest]
    #[case(InvariantViolation::RedRoot, "root of a non-empty tree is red")]
    #[case(
        InvariantViolation::RedRed { node: NodeId::new(4, 0) },
        "red node #4.0 has a red parent"
    )]
    #[case(
        InvariantViolation::BlackHeight { node: NodeId::new(1, 2), left: 2, right: 3 },
        "black height mismatch under #1.2: left 2, right 3"
    )]
    #[case(
        InvariantViolation::BoundCache { cached: NodeId::SENTINEL, actual: NodeId::new(0, 0) },
        "sentinel caches sentinel as a bound but the tree bound is #0.0"
    )]
    #[case(
        InvariantViolation::DanglingLink { node: NodeId::new(7, 1) },
        "link to #7.1 does not resolve to a live node"
    )]
    fn test_invariant_violation_display(
        #[case] violation: InvariantViolation,
        #[case] expected: &str,
    ) {
        assert_eq!(format!("{violation}"), expected);
    }

    #[rstest]
    fn test_invariant_violation_is_error() {
        let violation = InvariantViolation::Order {
            node: NodeId::new(0, 0),
        };
        let _: &dyn std::error::Error = &violation;
    }
}

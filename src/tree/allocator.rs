//! Node storage for the tree engine.
//!
//! The tree never owns nodes directly. It asks a [`NodeAllocator`] for a slot,
//! constructs the node into it, and destroys it when the node is erased. The
//! two-step allocate/construct protocol lets insertion fail before the tree is
//! touched.
//!
//! [`PoolAllocator`] is the default: a single-size pool of slots in a `Vec`
//! with an intrusive free list, optionally capped at a fixed number of live
//! nodes. A slot whose generation counter is exhausted is retired instead of
//! reused, so a stale handle never resolves again.

use std::fmt;

use super::node::{Node, NodeId};
use crate::error::AllocationError;

/// Creates, stores, and destroys tree nodes.
///
/// Handles returned by [`allocate`](NodeAllocator::allocate) must stay unique
/// among live nodes, and a destroyed handle must stop resolving through
/// [`get`](NodeAllocator::get).
pub trait NodeAllocator<V> {
    /// Reserves storage for one node.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if no storage is available.
    fn allocate(&mut self) -> Result<NodeId, AllocationError>;

    /// Places `node` into a slot previously returned by `allocate`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `id` was not reserved by `allocate`.
    fn construct(&mut self, id: NodeId, node: Node<V>);

    /// Removes the node at `id` and releases its slot.
    ///
    /// Returns `None` if `id` does not name a live node.
    fn destroy(&mut self, id: NodeId) -> Option<Node<V>>;

    /// Returns the live node at `id`.
    fn get(&self, id: NodeId) -> Option<&Node<V>>;

    /// Returns the live node at `id` mutably.
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<V>>;

    /// Destroys every node at once.
    fn reset(&mut self);

    /// Returns the number of slots currently reserved or occupied.
    fn live(&self) -> usize;
}

// =============================================================================
// PoolAllocator
// =============================================================================

#[derive(Clone)]
enum Slot<V> {
    Vacant {
        generation: u32,
        next_free: Option<usize>,
    },
    Reserved {
        generation: u32,
    },
    Occupied {
        generation: u32,
        node: Node<V>,
    },
    Retired,
}

impl<V> Slot<V> {
    const fn generation(&self) -> u32 {
        match self {
            Self::Vacant { generation, .. }
            | Self::Reserved { generation }
            | Self::Occupied { generation, .. } => *generation,
            Self::Retired => u32::MAX,
        }
    }

    /// The slot a destroyed node at `generation` leaves behind.
    const fn vacated(generation: u32, next_free: Option<usize>) -> Self {
        match generation.checked_add(1) {
            Some(generation) => Self::Vacant {
                generation,
                next_free,
            },
            None => Self::Retired,
        }
    }
}

/// A pool of node slots that reuses destroyed slots before growing.
///
/// # Examples
///
/// ```rust
/// use ordtree::error::AllocationError;
/// use ordtree::tree::{PoolAllocator, RbTree};
/// use ordtree::ordering::{Identity, NaturalOrder};
///
/// let pool = PoolAllocator::with_node_limit(2);
/// let mut tree: RbTree<i32> = RbTree::with_parts(Identity, NaturalOrder, pool);
/// tree.insert(1).unwrap();
/// tree.insert(2).unwrap();
/// assert_eq!(
///     tree.insert(3),
///     Err(AllocationError::CapacityExhausted { limit: 2 })
/// );
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Clone)]
pub struct PoolAllocator<V> {
    slots: Vec<Slot<V>>,
    free_head: Option<usize>,
    live: usize,
    limit: Option<usize>,
}

impl<V> PoolAllocator<V> {
    /// Creates an empty, unbounded pool.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
            limit: None,
        }
    }

    /// Creates an unbounded pool with room for `capacity` nodes before it grows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Creates a pool that refuses to hold more than `limit` live nodes.
    #[must_use]
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Returns the configured node limit, if any.
    #[inline]
    #[must_use]
    pub const fn node_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the number of slots ever created, live, vacant or retired.
    #[inline]
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<V>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation() == id.generation())
    }
}

impl<V> Default for PoolAllocator<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NodeAllocator<V> for PoolAllocator<V> {
    fn allocate(&mut self) -> Result<NodeId, AllocationError> {
        if let Some(limit) = self.limit
            && self.live >= limit
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(limit, "PoolAllocator: node limit reached");
            return Err(AllocationError::CapacityExhausted { limit });
        }

        let id = if let Some(index) = self.free_head {
            let Slot::Vacant {
                generation,
                next_free,
            } = self.slots[index]
            else {
                unreachable!("free list points at a slot that is in use");
            };
            self.free_head = next_free;
            self.slots[index] = Slot::Reserved { generation };
            NodeId::new(index, generation)
        } else {
            self.slots.try_reserve(1).inspect_err(|_error| {
                #[cfg(feature = "tracing")]
                tracing::debug!(slots = self.slots.len(), "PoolAllocator: growth failed");
            })?;
            let index = self.slots.len();
            self.slots.push(Slot::Reserved { generation: 0 });
            NodeId::new(index, 0)
        };

        self.live += 1;
        Ok(id)
    }

    fn construct(&mut self, id: NodeId, node: Node<V>) {
        let reserved = matches!(
            self.slots.get(id.index()),
            Some(Slot::Reserved { generation }) if *generation == id.generation()
        );
        assert!(reserved, "construct called on slot {id} that was not reserved");
        self.slots[id.index()] = Slot::Occupied {
            generation: id.generation(),
            node,
        };
    }

    fn destroy(&mut self, id: NodeId) -> Option<Node<V>> {
        if !matches!(self.slot(id), Some(Slot::Occupied { .. })) {
            return None;
        }
        let vacated = Slot::vacated(id.generation(), self.free_head);
        let retired = matches!(vacated, Slot::Retired);
        let Slot::Occupied { node, .. } = std::mem::replace(&mut self.slots[id.index()], vacated)
        else {
            unreachable!("slot was checked to be occupied");
        };
        if !retired {
            self.free_head = Some(id.index());
        }
        #[cfg(feature = "tracing")]
        if retired {
            tracing::debug!(node = %id, "PoolAllocator: slot retired");
        }
        self.live -= 1;
        Some(node)
    }

    #[inline]
    fn get(&self, id: NodeId) -> Option<&Node<V>> {
        match self.slot(id) {
            Some(Slot::Occupied { node, .. }) => Some(node),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation() => {
                Some(node)
            }
            _ => None,
        }
    }

    fn reset(&mut self) {
        // Vacate every slot under a new generation so outstanding handles go stale.
        let mut next_free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if matches!(slot, Slot::Retired) {
                continue;
            }
            *slot = Slot::vacated(slot.generation(), next_free);
            if !matches!(slot, Slot::Retired) {
                next_free = Some(index);
            }
        }
        self.free_head = next_free;
        self.live = 0;
    }

    #[inline]
    fn live(&self) -> usize {
        self.live
    }
}

impl<V> fmt::Debug for PoolAllocator<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PoolAllocator")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .field("limit", &self.limit)
            .finish()
    }
}

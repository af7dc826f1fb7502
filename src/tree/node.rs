use std::fmt;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    /// A red node; never the parent of another red node.
    Red,
    /// A black node; counted by the black height.
    Black,
}

// =============================================================================
// Node Handle
// =============================================================================

/// A handle to a node slot owned by a [`NodeAllocator`](super::NodeAllocator).
///
/// A handle pairs a slot index with the generation the slot had when the node
/// was allocated, so a handle to a destroyed node stops resolving even after the
/// slot is reused. [`NodeId::SENTINEL`] names the tree's sentinel, which is not
/// stored in the allocator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// The sentinel position: the tree's end and the parent of the root.
    pub const SENTINEL: Self = Self {
        index: usize::MAX,
        generation: u32::MAX,
    };

    /// Creates a handle for slot `index` at `generation`.
    #[inline]
    #[must_use]
    pub const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns the slot generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns `true` for [`NodeId::SENTINEL`].
    #[inline]
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.index == Self::SENTINEL.index && self.generation == Self::SENTINEL.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(formatter, "sentinel")
        } else {
            write!(formatter, "#{}.{}", self.index, self.generation)
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A stored value with its color and its three links.
///
/// `left` and `right` are the owning links; `parent` is a navigation-only
/// back-reference and is [`NodeId::SENTINEL`] for the root.
#[derive(Clone, Debug)]
pub struct Node<V> {
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: NodeId,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<V> Node<V> {
    /// Creates a detached red node, the state every node is born in.
    #[inline]
    pub const fn new_red(value: V) -> Self {
        Self {
            value,
            color: Color::Red,
            parent: NodeId::SENTINEL,
            left: None,
            right: None,
        }
    }

    /// Returns the stored value.
    #[inline]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the node's color.
    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns the parent link.
    #[inline]
    pub const fn parent(&self) -> NodeId {
        self.parent
    }

    /// Returns the left child link.
    #[inline]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Returns the right child link.
    #[inline]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Consumes the node and returns its value.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

// =============================================================================
// Sentinel
// =============================================================================

/// The tree's header: anchors the root and caches both bounds.
///
/// It is always black and never holds a value. When the tree is empty `root` is
/// `None` and both bounds are [`NodeId::SENTINEL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Sentinel {
    pub(crate) root: Option<NodeId>,
    pub(crate) leftmost: NodeId,
    pub(crate) rightmost: NodeId,
}

impl Sentinel {
    pub(crate) const COLOR: Color = Color::Black;

    pub(crate) const fn empty() -> Self {
        Self {
            root: None,
            leftmost: NodeId::SENTINEL,
            rightmost: NodeId::SENTINEL,
        }
    }
}

// =============================================================================
// Side
// =============================================================================

/// A child direction. Rotations and fixups are written once per [`Side`] and
/// mirrored through [`Side::opposite`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl<V> Node<V> {
    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_node_is_red_and_detached() {
        let node = Node::new_red(5);
        assert_eq!(node.color(), Color::Red);
        assert!(node.parent().is_sentinel());
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.into_value(), 5);
    }

    #[rstest]
    fn test_sentinel_id_is_distinguished() {
        assert!(NodeId::SENTINEL.is_sentinel());
        assert!(!NodeId::new(0, 0).is_sentinel());
        assert!(!NodeId::new(usize::MAX, 0).is_sentinel());
    }

    #[rstest]
    #[case(NodeId::new(3, 1), "#3.1")]
    #[case(NodeId::SENTINEL, "sentinel")]
    fn test_node_id_display(#[case] id: NodeId, #[case] expected: &str) {
        assert_eq!(id.to_string(), expected);
    }

    #[rstest]
    fn test_side_opposite_is_involution() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Left.opposite().opposite(), Side::Left);
    }

    #[rstest]
    fn test_child_accessors_follow_side() {
        let mut node = Node::new_red(());
        node.set_child(Side::Right, Some(NodeId::new(1, 0)));
        assert_eq!(node.child(Side::Right), Some(NodeId::new(1, 0)));
        assert_eq!(node.child(Side::Left), None);
    }

    #[rstest]
    fn test_empty_sentinel_points_at_itself() {
        let sentinel = Sentinel::empty();
        assert_eq!(sentinel.root, None);
        assert!(sentinel.leftmost.is_sentinel());
        assert!(sentinel.rightmost.is_sentinel());
        assert_eq!(Sentinel::COLOR, Color::Black);
    }
}

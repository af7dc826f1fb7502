//! Rotations and the two fixup procedures.
//!
//! Every case is written once for a deficit or violation on `side` and mirrored
//! through [`Side::opposite`], so the left-leaning and right-leaning shapes
//! share one body.

use super::node::{Color, NodeId, Sentinel, Side};
use super::{NodeAllocator, RbTree};

impl<V, X, C, A: NodeAllocator<V>> RbTree<V, X, C, A> {
    /// Rotates `pivot` down toward `side`; its child on the opposite side
    /// takes its place.
    ///
    /// ```text
    ///   rotate(p, Left):
    ///
    ///       p                r
    ///      / \              / \
    ///     a   r     =>     p   c
    ///        / \          / \
    ///       b   c        a   b
    /// ```
    pub(super) fn rotate(&mut self, pivot: NodeId, side: Side) {
        let Some(riser) = self.node(pivot).child(side.opposite()) else {
            unreachable!("rotation of {pivot} toward {side:?} needs a child on the other side");
        };

        let inner = self.node(riser).child(side);
        self.node_mut(pivot).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = pivot;
        }

        let parent = self.node(pivot).parent;
        self.replace_child(parent, pivot, Some(riser));
        self.node_mut(riser).parent = parent;

        self.node_mut(riser).set_child(side, Some(pivot));
        self.node_mut(pivot).parent = riser;
    }

    /// Restores the red-black invariants after `node` was attached as a red
    /// leaf.
    pub(super) fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let parent = self.node(node).parent;
            let parent_color = if parent.is_sentinel() {
                Sentinel::COLOR
            } else {
                self.node(parent).color
            };
            if parent_color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent is real.
            let grandparent = self.node(parent).parent;
            let side = self.side_of(parent);
            let uncle = self.node(grandparent).child(side.opposite());

            if let Some(uncle) = uncle
                && self.node(uncle).color == Color::Red
            {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = %node, "insert fixup: red uncle, recolor");

                self.node_mut(parent).color = Color::Black;
                self.node_mut(uncle).color = Color::Black;
                self.node_mut(grandparent).color = Color::Red;
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(node) == side.opposite() {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = %node, "insert fixup: inner child, rotate parent");

                node = parent;
                self.rotate(node, side);
                parent = self.node(node).parent;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(node = %node, "insert fixup: outer child, rotate grandparent");

            self.node_mut(parent).color = Color::Black;
            self.node_mut(grandparent).color = Color::Red;
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.sentinel.root {
            self.node_mut(root).color = Color::Black;
        }
    }

    /// Repairs the black-height deficit left at `deficit` (possibly an absent
    /// child) under `parent` after a black node was spliced out.
    pub(super) fn erase_fixup(&mut self, mut deficit: Option<NodeId>, mut parent: NodeId) {
        while !parent.is_sentinel() && self.color_of(deficit) == Color::Black {
            let side = if self.node(parent).left == deficit {
                Side::Left
            } else {
                Side::Right
            };
            let Some(mut sibling) = self.node(parent).child(side.opposite()) else {
                break;
            };

            if self.node(sibling).color == Color::Red {
                #[cfg(feature = "tracing")]
                tracing::trace!(parent = %parent, "erase fixup: red sibling, rotate parent");

                self.node_mut(sibling).color = Color::Black;
                self.node_mut(parent).color = Color::Red;
                self.rotate(parent, side);
                let Some(next_sibling) = self.node(parent).child(side.opposite()) else {
                    break;
                };
                sibling = next_sibling;
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());

            if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                #[cfg(feature = "tracing")]
                tracing::trace!(parent = %parent, "erase fixup: black nephews, push deficit up");

                self.node_mut(sibling).color = Color::Red;
                deficit = Some(parent);
                parent = self.node(parent).parent;
                continue;
            }

            if self.color_of(far) == Color::Black {
                #[cfg(feature = "tracing")]
                tracing::trace!(parent = %parent, "erase fixup: red near nephew, rotate sibling");

                if let Some(near) = near {
                    self.node_mut(near).color = Color::Black;
                }
                self.node_mut(sibling).color = Color::Red;
                self.rotate(sibling, side.opposite());
                let Some(next_sibling) = self.node(parent).child(side.opposite()) else {
                    break;
                };
                sibling = next_sibling;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(parent = %parent, "erase fixup: red far nephew, rotate parent");

            let parent_color = self.node(parent).color;
            self.node_mut(sibling).color = parent_color;
            self.node_mut(parent).color = Color::Black;
            if let Some(far) = self.node(sibling).child(side.opposite()) {
                self.node_mut(far).color = Color::Black;
            }
            self.rotate(parent, side);
            deficit = self.sentinel.root;
            break;
        }

        if let Some(deficit) = deficit {
            self.node_mut(deficit).color = Color::Black;
        }
    }
}

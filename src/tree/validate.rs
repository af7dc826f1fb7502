//! Structural checker for the red-black invariants.

use super::node::{Color, NodeId};
use super::{NodeAllocator, RbTree};
use crate::error::InvariantViolation;
use crate::ordering::{Comparator, KeyExtractor};

impl<V, X, C, A> RbTree<V, X, C, A>
where
    X: KeyExtractor<V>,
    C: Comparator<X::Key>,
    A: NodeAllocator<V>,
{
    /// Walks the whole tree and verifies every structural invariant.
    ///
    /// Returns the black height of the tree (the number of black nodes on any
    /// root-to-leaf path, not counting absent leaves) if every check passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Complexity
    ///
    /// O(N) time, O(log N) stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let tree: RbTree<i32> = (0..100).collect();
    /// assert!(tree.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.sentinel.root else {
            if !self.sentinel.leftmost.is_sentinel() {
                return Err(InvariantViolation::BoundCache {
                    cached: self.sentinel.leftmost,
                    actual: NodeId::SENTINEL,
                });
            }
            if !self.sentinel.rightmost.is_sentinel() {
                return Err(InvariantViolation::BoundCache {
                    cached: self.sentinel.rightmost,
                    actual: NodeId::SENTINEL,
                });
            }
            if self.length != 0 {
                return Err(InvariantViolation::Count {
                    recorded: self.length,
                    counted: 0,
                });
            }
            return Ok(0);
        };

        let Some(root_node) = self.allocator.get(root) else {
            return Err(InvariantViolation::DanglingLink { node: root });
        };
        if !root_node.parent.is_sentinel() {
            return Err(InvariantViolation::ParentLink { node: root });
        }
        if root_node.color == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }

        let mut counted = 0;
        let black_height = self.check_subtree(root, None, None, &mut counted)?;

        if counted != self.length {
            return Err(InvariantViolation::Count {
                recorded: self.length,
                counted,
            });
        }

        let leftmost = self.minimum(root);
        if self.sentinel.leftmost != leftmost {
            return Err(InvariantViolation::BoundCache {
                cached: self.sentinel.leftmost,
                actual: leftmost,
            });
        }
        let rightmost = self.maximum(root);
        if self.sentinel.rightmost != rightmost {
            return Err(InvariantViolation::BoundCache {
                cached: self.sentinel.rightmost,
                actual: rightmost,
            });
        }

        Ok(black_height)
    }

    /// Checks the subtree at `id`, whose keys must lie within the closed range
    /// `[lower, upper]`, and returns its black height.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&X::Key>,
        upper: Option<&X::Key>,
        counted: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let Some(node) = self.allocator.get(id) else {
            return Err(InvariantViolation::DanglingLink { node: id });
        };

        *counted += 1;
        // More reachable nodes than live slots means a link cycle.
        if *counted > self.allocator.live() {
            return Err(InvariantViolation::Count {
                recorded: self.length,
                counted: *counted,
            });
        }

        let key = self.key_extractor.key(&node.value);
        let below_lower = lower.is_some_and(|lower| self.comparator.less(key, lower));
        let above_upper = upper.is_some_and(|upper| self.comparator.less(upper, key));
        if below_lower || above_upper {
            return Err(InvariantViolation::Order { node: id });
        }

        let mut heights = [0; 2];
        for (height, (child, child_lower, child_upper)) in heights.iter_mut().zip([
            (node.left, lower, Some(key)),
            (node.right, Some(key), upper),
        ]) {
            let Some(child) = child else {
                continue;
            };
            let Some(child_node) = self.allocator.get(child) else {
                return Err(InvariantViolation::DanglingLink { node: child });
            };
            if child_node.parent != id {
                return Err(InvariantViolation::ParentLink { node: child });
            }
            if node.color == Color::Red && child_node.color == Color::Red {
                return Err(InvariantViolation::RedRed { node: child });
            }
            *height = self.check_subtree(child, child_lower, child_upper, counted)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeight {
                node: id,
                left,
                right,
            });
        }
        Ok(left + usize::from(node.color == Color::Black))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::InvariantViolation;
    use crate::tree::{Color, NodeId, RbTree};
    use rstest::rstest;

    fn tree_of(values: &[i32]) -> RbTree<i32> {
        values.iter().copied().collect()
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[1], 1)]
    #[case(&[1, 2, 3], 1)]
    fn test_black_height_of_small_trees(#[case] values: &[i32], #[case] expected: usize) {
        assert_eq!(tree_of(values).check_invariants(), Ok(expected));
    }

    #[rstest]
    fn test_duplicate_keys_pass_order_check() {
        let tree = tree_of(&[5; 16]);
        assert!(tree.check_invariants().is_ok());
    }

    #[rstest]
    fn test_detects_red_root() {
        let mut tree = tree_of(&[1]);
        let root = tree.sentinel.root.unwrap();
        tree.node_mut(root).color = Color::Red;
        assert_eq!(tree.check_invariants(), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_detects_red_red() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        // 3 is black after the uncle recolor, 4 is its red child.
        let three = tree.find(&3).node();
        tree.node_mut(three).color = Color::Red;
        let four = tree.find(&4).node();
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::RedRed { node: four })
        );
    }

    #[rstest]
    fn test_detects_black_height_mismatch() {
        let mut tree = tree_of(&[2, 1, 3]);
        let one = tree.find(&1).node();
        tree.node_mut(one).color = Color::Black;
        let root = tree.sentinel.root.unwrap();
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::BlackHeight {
                node: root,
                left: 1,
                right: 0,
            })
        );
    }

    #[rstest]
    fn test_detects_order_violation() {
        let mut tree = tree_of(&[2, 1, 3]);
        let one = tree.find(&1).node();
        tree.node_mut(one).value = 9;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::Order { node: one })
        );
    }

    #[rstest]
    fn test_detects_stale_bound_cache() {
        let mut tree = tree_of(&[2, 1, 3]);
        let actual = tree.sentinel.leftmost;
        tree.sentinel.leftmost = tree.find(&2).node();
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::BoundCache {
                cached: tree.find(&2).node(),
                actual,
            })
        );
    }

    #[rstest]
    fn test_detects_count_mismatch() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.length = 4;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::Count {
                recorded: 4,
                counted: 3,
            })
        );
    }

    #[rstest]
    fn test_detects_dangling_child_link() {
        let mut tree = tree_of(&[2, 1, 3]);
        let root = tree.sentinel.root.unwrap();
        let forged = NodeId::new(99, 0);
        tree.node_mut(root).left = Some(forged);
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::DanglingLink { node: forged })
        );
    }

    #[rstest]
    fn test_detects_broken_parent_link() {
        let mut tree = tree_of(&[2, 1, 3]);
        let one = tree.find(&1).node();
        let three = tree.find(&3).node();
        tree.node_mut(one).parent = three;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantViolation::ParentLink { node: one })
        );
    }
}

use thiserror::Error;

use crate::tree::{Color, Id, LEFT, RIGHT, RbTree};

/// Shape summary returned by a successful [`RbTree::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub len: usize,
    pub height: usize,
    /// Black nodes on every root-to-leaf path, root included.
    pub black_height: usize,
}

/// First broken invariant found by [`RbTree::validate`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("root is red")]
    RedRoot,
    #[error("red node {key} has a red child")]
    ConsecutiveReds { key: i64 },
    #[error("unbalanced blacks under {key}: left {left}, right {right}")]
    UnbalancedBlacks { key: i64, left: usize, right: usize },
    #[error("key {key} is out of order under parent {parent}")]
    OutOfOrder { key: i64, parent: i64 },
    #[error("parent link of {key} is broken")]
    BrokenParentLink { key: i64 },
    #[error("cached {which} does not match the tree")]
    StaleExtreme { which: &'static str },
    #[error("size is {len} but {reachable} nodes are reachable")]
    SizeMismatch { len: usize, reachable: usize },
}

impl<V> RbTree<V> {
    /// Checks ordering, coloring, black-height, parent links, the cached
    /// extremes and the size.
    pub fn validate(&self) -> Result<Stats, Violation> {
        if self.is_red(self.root) {
            return Err(Violation::RedRoot);
        }
        if !self.root.is_nil() && !self.node(self.root).p.is_nil() {
            return Err(Violation::BrokenParentLink {
                key: self.node(self.root).key,
            });
        }

        let mut reachable = 0;
        let (black_height, height) =
            self.validate_subtree(self.root, None, None, &mut reachable)?;
        if reachable != self.len() {
            return Err(Violation::SizeMismatch {
                len: self.len(),
                reachable,
            });
        }

        let (min, max) = if self.root.is_nil() {
            (Id::NIL, Id::NIL)
        } else {
            (self.leftmost(self.root), self.rightmost(self.root))
        };
        if self.min != min {
            return Err(Violation::StaleExtreme { which: "min" });
        }
        if self.max != max {
            return Err(Violation::StaleExtreme { which: "max" });
        }

        Ok(Stats {
            len: reachable,
            height,
            black_height,
        })
    }

    /// Returns `(black_height, height)` of the subtree at `x`, whose keys
    /// must lie strictly between `lo` and `hi`.
    fn validate_subtree(
        &self,
        x: Id,
        lo: Option<i64>,
        hi: Option<i64>,
        reachable: &mut usize,
    ) -> Result<(usize, usize), Violation> {
        if x.is_nil() {
            return Ok((0, 0));
        }
        *reachable += 1;
        if *reachable > self.len() {
            // A cycle or a shared child; stop before recursing forever.
            return Err(Violation::SizeMismatch {
                len: self.len(),
                reachable: *reachable,
            });
        }

        let node = self.node(x);
        if lo.is_some_and(|lo| node.key <= lo) || hi.is_some_and(|hi| node.key >= hi) {
            return Err(Violation::OutOfOrder {
                key: node.key,
                parent: self.node(node.p).key,
            });
        }

        let red = node.color == Color::Red;
        for c in node.ch {
            if c.is_nil() {
                continue;
            }
            if self.node(c).p != x {
                return Err(Violation::BrokenParentLink {
                    key: self.node(c).key,
                });
            }
            if red && self.is_red(c) {
                return Err(Violation::ConsecutiveReds { key: node.key });
            }
        }

        let (left, left_height) =
            self.validate_subtree(node.ch[LEFT], lo, Some(node.key), reachable)?;
        let (right, right_height) =
            self.validate_subtree(node.ch[RIGHT], Some(node.key), hi, reachable)?;
        if left != right {
            return Err(Violation::UnbalancedBlacks {
                key: node.key,
                left,
                right,
            });
        }

        Ok((left + usize::from(!red), 1 + left_height.max(right_height)))
    }
}

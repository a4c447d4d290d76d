use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::tree::{Color, Id, LEFT, RIGHT, RbTree};

/// Read-only snapshot of one node, as seen by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeView {
    pub key: i64,
    pub color: Color,
    /// Distance from the root, which sits at depth 0.
    pub depth: usize,
    pub has_left: bool,
    pub has_right: bool,
}

/// Breadth-first walk over the tree, created by [`RbTree::walk`].
///
/// Nodes come out layer by layer, left to right, so a renderer can rebuild
/// the shape from the depth and child flags alone.
pub struct Walk<'a, V> {
    tree: &'a RbTree<V>,
    queue: VecDeque<(Id, usize)>,
    remaining: usize,
}

impl<V> RbTree<V> {
    pub fn walk(&self) -> Walk<'_, V> {
        let mut queue = VecDeque::new();
        if !self.root.is_nil() {
            queue.push_back((self.root, 0));
        }
        Walk {
            tree: self,
            queue,
            remaining: self.len(),
        }
    }
}

impl<V> Iterator for Walk<'_, V> {
    type Item = NodeView;

    fn next(&mut self) -> Option<NodeView> {
        let (x, depth) = self.queue.pop_front()?;
        let node = self.tree.node(x);
        for c in node.ch {
            if !c.is_nil() {
                self.queue.push_back((c, depth + 1));
            }
        }
        self.remaining -= 1;
        Some(NodeView {
            key: node.key,
            color: node.color,
            depth,
            has_left: !node.ch[LEFT].is_nil(),
            has_right: !node.ch[RIGHT].is_nil(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Walk<'_, V> {}

impl<V> FusedIterator for Walk<'_, V> {}

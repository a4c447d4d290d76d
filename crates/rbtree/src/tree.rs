use std::cmp::Ordering;

use log::{debug, trace};

use crate::error::{RbTreeError, Result};

pub(crate) const LEFT: usize = 0;
pub(crate) const RIGHT: usize = 1;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id(u32);

impl Id {
    pub(crate) const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[inline(always)]
fn id(v: usize) -> Id {
    assert!(v < u32::MAX as usize, "node arena is full");
    Id(v as u32)
}

/// Node color. Absent children count as [`Color::Black`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    pub(crate) key: i64,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) p: Id,
    pub(crate) ch: [Id; 2],
}

enum Slot {
    Occupied(Id),
    Vacant { parent: Id, dir: usize },
}

/// Red-black tree map keyed by `i64`.
///
/// Nodes live in an arena and refer to each other by index, so parent links
/// never own anything. Removing a node frees its slot right away: the last
/// slot is moved into the hole and every link to it is patched.
///
/// The cached minimum and maximum make [`min`](Self::min) and
/// [`max`](Self::max) O(1). Every other operation is O(log n).
///
/// Deletion of a node with two children moves the successor's key and value
/// into that node before unlinking the successor, so slot positions are not
/// stable across mutations. Nothing outside the tree holds on to them.
#[derive(Clone, Debug)]
pub struct RbTree<V> {
    pub(crate) nodes: Vec<Node<V>>,
    pub(crate) root: Id,
    pub(crate) min: Id,
    pub(crate) max: Id,
}

impl<V> Default for RbTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RbTree<V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: Id::NIL,
            min: Id::NIL,
            max: Id::NIL,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.walk().map(|view| view.depth + 1).max().unwrap_or(0)
    }

    pub fn get(&self, key: i64) -> Result<&V> {
        match self.locate(key) {
            Slot::Occupied(x) => Ok(&self.node(x).value),
            Slot::Vacant { .. } => Err(RbTreeError::KeyNotFound(key)),
        }
    }

    pub fn get_mut(&mut self, key: i64) -> Result<&mut V> {
        match self.locate(key) {
            Slot::Occupied(x) => Ok(&mut self.node_mut(x).value),
            Slot::Vacant { .. } => Err(RbTreeError::KeyNotFound(key)),
        }
    }

    pub fn contains_key(&self, key: i64) -> bool {
        matches!(self.locate(key), Slot::Occupied(_))
    }

    pub fn min(&self) -> Result<(i64, &V)> {
        self.entry(self.min)
    }

    pub fn max(&self) -> Result<(i64, &V)> {
        self.entry(self.max)
    }

    /// Inserts a new key.
    ///
    /// An existing key is never overwritten: the call fails with
    /// [`RbTreeError::KeyAlreadyExists`] and the tree is left as it was.
    ///
    /// # Panics
    ///
    /// Nodes are addressed by `u32` slots with `u32::MAX` reserved, so the
    /// tree holds at most `u32::MAX - 1` keys. Inserting past that panics.
    pub fn insert(&mut self, key: i64, value: V) -> Result<()> {
        let (parent, dir) = match self.locate(key) {
            Slot::Occupied(_) => {
                debug!("rejected duplicate key {key}");
                return Err(RbTreeError::KeyAlreadyExists(key));
            }
            Slot::Vacant { parent, dir } => (parent, dir),
        };

        if parent.is_nil() {
            let x = self.alloc(key, value, Color::Black, Id::NIL);
            self.root = x;
            self.min = x;
            self.max = x;
            return Ok(());
        }

        let x = self.alloc(key, value, Color::Red, parent);
        self.node_mut(parent).ch[dir] = x;
        if key < self.node(self.min).key {
            self.min = x;
        }
        if key > self.node(self.max).key {
            self.max = x;
        }
        self.insert_fixup(x);
        Ok(())
    }

    /// Removes `key` and returns its value.
    ///
    /// A missing key is reported as [`RbTreeError::KeyNotFound`] and leaves
    /// the tree untouched.
    pub fn delete(&mut self, key: i64) -> Result<V> {
        let Slot::Occupied(mut x) = self.locate(key) else {
            return Err(RbTreeError::KeyNotFound(key));
        };

        let [left, right] = self.node(x).ch;
        if !left.is_nil() && !right.is_nil() {
            let succ = self.leftmost(right);
            self.swap_payload(x, succ);
            x = succ;
        }
        Ok(self.remove_node(x).value)
    }

    pub fn clear(&mut self) {
        debug!("clearing {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = Id::NIL;
        self.min = Id::NIL;
        self.max = Id::NIL;
    }

    #[inline(always)]
    pub(crate) fn node(&self, x: Id) -> &Node<V> {
        debug_assert!(!x.is_nil());
        &self.nodes[x.idx()]
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node<V> {
        debug_assert!(!x.is_nil());
        &mut self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn is_red(&self, x: Id) -> bool {
        !x.is_nil() && self.node(x).color == Color::Red
    }

    #[inline(always)]
    fn paint(&mut self, x: Id, color: Color) {
        self.node_mut(x).color = color;
    }

    /// Which child of its parent `x` is. `x` must not be the root.
    #[inline(always)]
    fn side(&self, x: Id) -> usize {
        let p = self.node(x).p;
        usize::from(self.node(p).ch[RIGHT] == x)
    }

    pub(crate) fn leftmost(&self, mut x: Id) -> Id {
        while !self.node(x).ch[LEFT].is_nil() {
            x = self.node(x).ch[LEFT];
        }
        x
    }

    pub(crate) fn rightmost(&self, mut x: Id) -> Id {
        while !self.node(x).ch[RIGHT].is_nil() {
            x = self.node(x).ch[RIGHT];
        }
        x
    }

    fn entry(&self, x: Id) -> Result<(i64, &V)> {
        if x.is_nil() {
            return Err(RbTreeError::EmptyTree);
        }
        let node = self.node(x);
        Ok((node.key, &node.value))
    }

    fn locate(&self, key: i64) -> Slot {
        let mut parent = Id::NIL;
        let mut dir = LEFT;
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.node(cur);
            dir = match key.cmp(&node.key) {
                Ordering::Less => LEFT,
                Ordering::Greater => RIGHT,
                Ordering::Equal => return Slot::Occupied(cur),
            };
            parent = cur;
            cur = node.ch[dir];
        }
        Slot::Vacant { parent, dir }
    }

    fn alloc(&mut self, key: i64, value: V, color: Color, p: Id) -> Id {
        let x = id(self.nodes.len());
        self.nodes.push(Node {
            key,
            value,
            color,
            p,
            ch: [Id::NIL, Id::NIL],
        });
        x
    }

    /// Points `p`'s link to `old` at `new` instead; a nil `p` means the root.
    fn replace_child(&mut self, p: Id, old: Id, new: Id) {
        if p.is_nil() {
            self.root = new;
        } else {
            let dir = usize::from(self.node(p).ch[RIGHT] == old);
            self.node_mut(p).ch[dir] = new;
        }
        if !new.is_nil() {
            self.node_mut(new).p = p;
        }
    }

    /// Single rotation that moves `x` down on the `dir` side.
    ///
    /// `rotate(x, LEFT)` is the left rotation: the right child of `x` takes
    /// its place and `x` becomes that child's left child. Colors are kept.
    fn rotate(&mut self, x: Id, dir: usize) {
        let y = self.node(x).ch[dir ^ 1];
        debug_assert!(!y.is_nil());
        let inner = self.node(y).ch[dir];

        self.node_mut(x).ch[dir ^ 1] = inner;
        if !inner.is_nil() {
            self.node_mut(inner).p = x;
        }

        let p = self.node(x).p;
        self.replace_child(p, x, y);

        self.node_mut(y).ch[dir] = x;
        self.node_mut(x).p = y;
    }

    fn insert_fixup(&mut self, mut x: Id) {
        while self.is_red(self.node(x).p) {
            let p = self.node(x).p;
            let g = self.node(p).p;
            debug_assert!(!g.is_nil(), "a red node is never the root");
            let pdir = self.side(p);
            let uncle = self.node(g).ch[pdir ^ 1];

            if self.is_red(uncle) {
                trace!("insert fixup at {}: red uncle", self.node(x).key);
                self.paint(p, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(g, Color::Red);
                x = g;
                continue;
            }

            if self.side(x) == pdir {
                trace!("insert fixup at {}: outer child", self.node(x).key);
                self.paint(p, Color::Black);
                self.paint(g, Color::Red);
                self.rotate(g, pdir ^ 1);
            } else {
                trace!("insert fixup at {}: inner child", self.node(x).key);
                self.paint(x, Color::Black);
                self.paint(g, Color::Red);
                self.rotate(p, pdir);
                self.rotate(g, pdir ^ 1);
            }
            break;
        }
        let root = self.root;
        self.paint(root, Color::Black);
    }

    /// Unlinks `x`, which has at most one child, and frees its slot.
    fn remove_node(&mut self, x: Id) -> Node<V> {
        let [left, right] = self.node(x).ch;
        debug_assert!(left.is_nil() || right.is_nil());
        let child = if left.is_nil() { right } else { left };
        let parent = self.node(x).p;

        if !child.is_nil() {
            debug_assert!(self.node(x).color == Color::Black && self.is_red(child));
            self.replace_child(parent, x, child);
            self.paint(child, Color::Black);
            if self.min == x {
                self.min = child;
            }
            if self.max == x {
                self.max = child;
            }
        } else if parent.is_nil() {
            self.root = Id::NIL;
            self.min = Id::NIL;
            self.max = Id::NIL;
        } else {
            if self.node(x).color == Color::Black {
                self.delete_fixup(x);
            }
            // Rotations above may have given `x` a different parent.
            let parent = self.node(x).p;
            self.replace_child(parent, x, Id::NIL);
            if self.min == x {
                self.min = parent;
            }
            if self.max == x {
                self.max = parent;
            }
        }

        self.release(x)
    }

    /// Restores black-height when the subtree at `x` is one black short.
    fn delete_fixup(&mut self, mut x: Id) {
        loop {
            let p = self.node(x).p;
            if p.is_nil() {
                break;
            }
            let dir = self.side(x);
            let sibling = self.node(p).ch[dir ^ 1];
            debug_assert!(!sibling.is_nil(), "a short subtree always has a sibling");

            if self.is_red(sibling) {
                trace!("delete fixup at {}: red sibling", self.node(x).key);
                self.rotate(p, dir);
                self.paint(p, Color::Red);
                self.paint(sibling, Color::Black);
                continue;
            }

            let [near, far] = {
                let ch = self.node(sibling).ch;
                [ch[dir], ch[dir ^ 1]]
            };
            if !self.is_red(near) && !self.is_red(far) {
                self.paint(sibling, Color::Red);
                if self.is_red(p) {
                    trace!("delete fixup at {}: absorbed by red parent", self.node(x).key);
                    self.paint(p, Color::Black);
                    break;
                }
                trace!("delete fixup at {}: propagate", self.node(x).key);
                x = p;
                continue;
            }

            if !self.is_red(far) {
                trace!("delete fixup at {}: near nephew", self.node(x).key);
                self.rotate(sibling, dir ^ 1);
            } else {
                trace!("delete fixup at {}: far nephew", self.node(x).key);
            }
            let parent_color = self.node(p).color;
            self.rotate(p, dir);
            let top = self.node(p).p;
            self.paint(top, parent_color);
            let [a, b] = self.node(top).ch;
            self.paint(a, Color::Black);
            self.paint(b, Color::Black);
            break;
        }
    }

    fn swap_payload(&mut self, a: Id, b: Id) {
        debug_assert!(a != b);
        let (lo, hi) = if a.idx() < b.idx() { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(hi.idx());
        let (x, y) = (&mut head[lo.idx()], &mut tail[0]);
        std::mem::swap(&mut x.key, &mut y.key);
        std::mem::swap(&mut x.value, &mut y.value);
    }

    /// Frees the slot of a detached node by moving the last slot into it.
    fn release(&mut self, x: Id) -> Node<V> {
        let last = id(self.nodes.len() - 1);
        if x != last {
            let p = self.node(last).p;
            if p.is_nil() {
                self.root = x;
            } else {
                let dir = self.side(last);
                self.node_mut(p).ch[dir] = x;
            }
            for c in self.node(last).ch {
                if !c.is_nil() {
                    self.node_mut(c).p = x;
                }
            }
            if self.min == last {
                self.min = x;
            }
            if self.max == last {
                self.max = x;
            }
        }
        self.nodes.swap_remove(x.idx())
    }
}

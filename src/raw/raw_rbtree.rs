use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Direction, Node};
use crate::{AllocError, Violation};

/// Inline capacity of the explicit stacks used by whole-tree walks. A red-black tree holding
/// `Handle::MAX` nodes is at most `2 * log2(Handle::MAX)` deep.
const WALK_STACK: usize = 64;

/// The comparator-free red-black tree backing `RBTree`.
///
/// Owns the node arena and the cached `root`/`leftmost`/`rightmost` handles, which play the part
/// of a header sentinel: all three are `None` exactly when the tree is empty. Everything here is
/// purely structural (links, colors, rotations); key ordering lives in the facade.
pub(crate) struct RawRBTree<V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<V>>,
    root: Option<Handle>,
    /// Minimum node, for O(1) `begin`.
    leftmost: Option<Handle>,
    /// Maximum node, for O(1) `end - 1`.
    rightmost: Option<Handle>,
}

impl<V> RawRBTree<V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            leftmost: None,
            rightmost: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            leftmost: None,
            rightmost: None,
        }
    }

    /// Returns the number of nodes in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.nodes.try_reserve(additional)
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn leftmost(&self) -> Option<Handle> {
        self.leftmost
    }

    pub(crate) fn rightmost(&self) -> Option<Handle> {
        self.rightmost
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.nodes.get(handle).value()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.nodes.get_mut(handle).value_mut()
    }

    /// Missing children count as black.
    #[inline]
    fn color_of(&self, handle: Option<Handle>) -> Color {
        handle.map_or(Color::Black, |h| self.node(h).color())
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).set_color(color);
    }

    /// Descends to the extreme node of the subtree at `handle` in direction `dir`.
    pub(crate) fn extreme(&self, mut handle: Handle, dir: Direction) -> Handle {
        while let Some(child) = self.node(handle).child(dir) {
            handle = child;
        }
        handle
    }

    pub(crate) fn minimum(&self, handle: Handle) -> Handle {
        self.extreme(handle, Direction::Left)
    }

    pub(crate) fn maximum(&self, handle: Handle) -> Handle {
        self.extreme(handle, Direction::Right)
    }

    /// In-order neighbour of `handle` in direction `dir` (`Right` = successor), or `None` when
    /// `handle` is the last node in that direction.
    fn step(&self, handle: Handle, dir: Direction) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(dir) {
            return Some(self.extreme(child, dir.opposite()));
        }
        // Climb while we are the `dir` child; the first ancestor reached from the other side is
        // the neighbour. Climbing off the root means there is none.
        let mut current = handle;
        while let Some(parent) = self.node(current).parent() {
            if self.node(parent).child(dir) == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    /// Returns the in-order successor of `handle`.
    #[inline]
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Direction::Right)
    }

    /// Returns the in-order predecessor of `handle`.
    #[inline]
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Direction::Left)
    }

    /// Points `parent`'s link that currently holds `old` at `new`, or the root when `parent` is
    /// `None`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let dir = if self.node(parent).left() == Some(old) {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.node_mut(parent).set_child(dir, new);
            }
        }
    }

    /// Rotates the subtree at `x` toward `dir`: `x`'s child on the opposite side takes `x`'s place
    /// and `x` becomes its `dir` child. `rotate(x, Left)` is the classic left rotation.
    ///
    /// Does nothing when that child is missing.
    fn rotate(&mut self, x: Handle, dir: Direction) {
        let Some(y) = self.node(x).child(dir.opposite()) else {
            return;
        };

        let inner = self.node(y).child(dir);
        self.node_mut(x).set_child(dir.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(x));
        }

        let parent = self.node(x).parent();
        self.node_mut(y).set_parent(parent);
        self.replace_child(parent, x, Some(y));

        self.node_mut(y).set_child(dir, Some(x));
        self.node_mut(x).set_parent(Some(y));
    }

    /// Links `value` as a new red leaf in the empty `dir` slot of `parent` (or as the root when
    /// `parent` is `None`) and rebalances.
    ///
    /// The caller has already chosen a slot that keeps the tree ordered.
    pub(crate) fn link(&mut self, parent: Option<Handle>, dir: Direction, value: V) -> Handle {
        let handle = self.nodes.allocate_one(Node::new_leaf(parent, value));

        match parent {
            None => {
                debug_assert!(self.root.is_none(), "`RawRBTree::link()` - root slot is occupied!");
                self.root = Some(handle);
                self.leftmost = Some(handle);
                self.rightmost = Some(handle);
            }
            Some(parent) => {
                debug_assert!(self.node(parent).child(dir).is_none(), "`RawRBTree::link()` - child slot is occupied!");
                self.node_mut(parent).set_child(dir, Some(handle));
                match dir {
                    Direction::Left if self.leftmost == Some(parent) => self.leftmost = Some(handle),
                    Direction::Right if self.rightmost == Some(parent) => self.rightmost = Some(handle),
                    _ => {}
                }
            }
        }

        self.insert_fixup(handle);
        handle
    }

    /// Restores the red-black coloring after `x` was attached as a red leaf.
    fn insert_fixup(&mut self, mut x: Handle) {
        while let Some(parent) = self.node(x).parent() {
            if !self.node(parent).is_red() {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = self.node(parent).parent() else {
                break;
            };
            let side = if self.node(grand).left() == Some(parent) {
                Direction::Left
            } else {
                Direction::Right
            };
            let uncle = self.node(grand).child(side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.node(u).is_red()) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                x = grand;
                continue;
            }

            let mut parent = parent;
            if self.node(parent).child(side.opposite()) == Some(x) {
                // Straighten the zig-zag so that x, parent and grand lie on one side.
                self.rotate(parent, side);
                (x, parent) = (parent, x);
            }
            self.set_color(parent, Color::Black);
            self.set_color(grand, Color::Red);
            self.rotate(grand, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Unlinks `z` from the tree, rebalances, and returns its value.
    ///
    /// Only `z` leaves the arena: when `z` has two children its successor is relinked into `z`'s
    /// place (taking `z`'s color), so every other handle keeps pointing at the same element.
    pub(crate) fn erase(&mut self, z: Handle) -> V {
        let z_left = self.node(z).left();
        let z_right = self.node(z).right();
        let z_parent = self.node(z).parent();

        // Only a node with at most one child can be a cached extreme.
        if self.leftmost == Some(z) {
            self.leftmost = match z_right {
                Some(right) => Some(self.minimum(right)),
                None => z_parent,
            };
        }
        if self.rightmost == Some(z) {
            self.rightmost = match z_left {
                Some(left) => Some(self.maximum(left)),
                None => z_parent,
            };
        }

        let (x, x_parent, removed_color) = match (z_left, z_right) {
            (Some(left), Some(right)) => {
                let y = self.minimum(right);
                let x = self.node(y).right();

                self.node_mut(y).set_child(Direction::Left, Some(left));
                self.node_mut(left).set_parent(Some(y));

                let x_parent = if y == right {
                    y
                } else {
                    // y is the leftmost node of `right`, so it hangs left of its parent.
                    let y_parent = self.node(y).parent().unwrap_or(right);
                    if let Some(x) = x {
                        self.node_mut(x).set_parent(Some(y_parent));
                    }
                    self.node_mut(y_parent).set_child(Direction::Left, x);
                    self.node_mut(y).set_child(Direction::Right, Some(right));
                    self.node_mut(right).set_parent(Some(y));
                    y_parent
                };

                self.replace_child(z_parent, z, Some(y));
                self.node_mut(y).set_parent(z_parent);

                // y inherits z's color; the color physically removed from the tree is y's.
                let y_color = self.node(y).color();
                let z_color = self.node(z).color();
                self.set_color(y, z_color);
                (x, Some(x_parent), y_color)
            }
            _ => {
                let x = z_left.or(z_right);
                if let Some(x) = x {
                    self.node_mut(x).set_parent(z_parent);
                }
                self.replace_child(z_parent, z, x);
                (x, z_parent, self.node(z).color())
            }
        };

        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }

        self.nodes.deallocate_one(z).into_value()
    }

    /// Resolves the black-height deficit at `x` (possibly a missing child of `x_parent`).
    fn erase_fixup(&mut self, mut x: Option<Handle>, mut x_parent: Option<Handle>) {
        while x != self.root && self.color_of(x) == Color::Black {
            let Some(parent) = x_parent else {
                break;
            };
            let side = if self.node(parent).left() == x {
                Direction::Left
            } else {
                Direction::Right
            };

            let mut sibling = self.sibling_of(parent, side);
            if self.node(sibling).is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.sibling_of(parent, side);
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());
            if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                self.set_color(sibling, Color::Red);
                x = Some(parent);
                x_parent = self.node(parent).parent();
                continue;
            }

            if self.color_of(far) == Color::Black {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling_of(parent, side);
            }

            let parent_color = self.node(parent).color();
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            if let Some(far) = self.node(sibling).child(side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.rotate(parent, side);
            x = self.root;
            break;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }

    /// The child of `parent` opposite `side`. A black-deficient side always has one.
    fn sibling_of(&self, parent: Handle, side: Direction) -> Handle {
        self.node(parent)
            .child(side.opposite())
            .expect("`RawRBTree::erase_fixup()` - black-deficient node has no sibling!")
    }

    /// Drops every node without rebalancing.
    ///
    /// The arena stores nodes flat, so this never recurses regardless of tree depth.
    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
        self.nodes.reset();
    }

    /// Moves every value out in order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<V> {
        let mut order = Vec::with_capacity(self.len());
        let mut current = self.leftmost;
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }

        let values = order.into_iter().map(|h| self.nodes.deallocate_one(h).into_value()).collect();
        self.clear();
        values
    }

    /// Swaps the whole structure with `other`.
    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Deep-copies `self` into `out`, which must be empty. Walks top-down with an explicit stack.
    fn copy_into(&self, out: &mut Self)
    where
        V: Clone,
    {
        debug_assert!(out.is_empty(), "`RawRBTree::copy_into()` - target is not empty!");
        let Some(root) = self.root else {
            return;
        };

        let new_root = out.nodes.allocate_one(Node::detached_clone(self.node(root)));
        out.root = Some(new_root);

        let mut stack: SmallVec<[(Handle, Handle); WALK_STACK]> = SmallVec::new();
        stack.push((root, new_root));
        while let Some((source, target)) = stack.pop() {
            for dir in [Direction::Left, Direction::Right] {
                if let Some(source_child) = self.node(source).child(dir) {
                    let mut copy = Node::detached_clone(self.node(source_child));
                    copy.set_parent(Some(target));
                    let target_child = out.nodes.allocate_one(copy);
                    out.node_mut(target).set_child(dir, Some(target_child));
                    stack.push((source_child, target_child));
                }
            }
        }

        out.leftmost = Some(out.minimum(new_root));
        out.rightmost = Some(out.maximum(new_root));
    }

    /// Like `clone`, but reports allocation failure instead of aborting.
    pub(crate) fn try_clone(&self) -> Result<Self, AllocError>
    where
        V: Clone,
    {
        let mut out = Self::new();
        out.try_reserve(self.len())?;
        self.copy_into(&mut out);
        Ok(out)
    }

    /// Number of black nodes from `handle` up to and including the root.
    fn black_depth(&self, handle: Handle) -> usize {
        let mut count = 0;
        let mut current = Some(handle);
        while let Some(h) = current {
            if !self.node(h).is_red() {
                count += 1;
            }
            current = self.node(h).parent();
        }
        count
    }

    /// Checks every invariant that does not involve key order.
    pub(crate) fn verify_structure(&self) -> Result<(), Violation> {
        let Some(root) = self.root else {
            if self.leftmost.is_some() {
                return Err(Violation::Leftmost);
            }
            if self.rightmost.is_some() {
                return Err(Violation::Rightmost);
            }
            if self.len() != 0 {
                return Err(Violation::Length {
                    expected: self.len(),
                    found: 0,
                });
            }
            return Ok(());
        };

        if self.node(root).is_red() {
            return Err(Violation::RedRoot);
        }
        if self.node(root).parent().is_some() {
            return Err(Violation::RootParent);
        }
        if self.leftmost != Some(self.minimum(root)) {
            return Err(Violation::Leftmost);
        }
        if self.rightmost != Some(self.maximum(root)) {
            return Err(Violation::Rightmost);
        }

        let expected_black = self.black_depth(self.minimum(root));
        let mut index = 0;
        let mut current = self.leftmost;
        while let Some(handle) = current {
            let node = self.node(handle);
            for child in [node.left(), node.right()].into_iter().flatten() {
                if self.node(child).parent() != Some(handle) {
                    return Err(Violation::ParentLink {
                        index,
                    });
                }
                if node.is_red() && self.node(child).is_red() {
                    return Err(Violation::RedRed {
                        index,
                    });
                }
            }
            if node.left().is_none() || node.right().is_none() {
                let found = self.black_depth(handle);
                if found != expected_black {
                    return Err(Violation::BlackHeight {
                        index,
                        expected: expected_black,
                        found,
                    });
                }
            }
            index += 1;
            current = self.successor(handle);
        }

        if index != self.len() {
            return Err(Violation::Length {
                expected: self.len(),
                found: index,
            });
        }
        Ok(())
    }
}

impl<V: Clone> Clone for RawRBTree<V> {
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.len());
        self.copy_into(&mut out);
        out
    }
}

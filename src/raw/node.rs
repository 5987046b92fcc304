use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// A tree node. Links are navigation only; the arena owns every node.
pub(crate) struct Node<V> {
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    color: Color,
    value: V,
}

impl<V> Node<V> {
    /// Creates a detached red leaf under `parent`.
    pub(crate) fn new_leaf(parent: Option<Handle>, value: V) -> Self {
        Self {
            parent,
            left: None,
            right: None,
            color: Color::Red,
            value,
        }
    }

    /// Creates a copy of `other`'s color and value with no links; the caller wires it up.
    pub(crate) fn detached_clone(other: &Self) -> Self
    where
        V: Clone,
    {
        Self {
            parent: None,
            left: None,
            right: None,
            color: other.color,
            value: other.value.clone(),
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, dir: Direction) -> Option<Handle> {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Direction, child: Option<Handle>) {
        match dir {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) fn into_value(self) -> V {
        self.value
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_is_red_and_unlinked() {
        let parent = Handle::from_index(3);
        let node = Node::new_leaf(Some(parent), 42);
        assert_eq!(node.parent(), Some(parent));
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert!(node.is_red());
        assert_eq!(*node.value(), 42);
    }

    #[test]
    fn child_by_direction() {
        let mut node = Node::new_leaf(None, ());
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);
        node.set_child(Direction::Left, Some(a));
        node.set_child(Direction::Left.opposite(), Some(b));
        assert_eq!(node.left(), Some(a));
        assert_eq!(node.child(Direction::Right), Some(b));
    }

    #[test]
    fn detached_clone_drops_links() {
        let mut node = Node::new_leaf(Some(Handle::from_index(0)), 7);
        node.set_color(Color::Black);
        node.set_child(Direction::Right, Some(Handle::from_index(1)));
        let copy = Node::detached_clone(&node);
        assert_eq!(copy.color(), Color::Black);
        assert_eq!(copy.parent(), None);
        assert_eq!(copy.right(), None);
        assert_eq!(copy.into_value(), 7);
    }
}

use core::fmt;

/// The error returned when the tree cannot obtain storage for another node.
///
/// Returned by the `try_*` family ([`RBTree::try_insert_unique`](crate::RBTree::try_insert_unique),
/// [`RBTree::try_reserve`](crate::RBTree::try_reserve), ...). The tree is left exactly as it was
/// before the call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AllocError {
    /// The tree already holds the maximum number of nodes a handle can address.
    CapacityOverflow,
    /// The global allocator refused to grow the node storage.
    OutOfMemory,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow => f.write_str("node capacity exceeds the maximum tree size"),
            AllocError::OutOfMemory => f.write_str("memory allocation for a tree node failed"),
        }
    }
}

impl core::error::Error for AllocError {}

/// A broken structural invariant, reported by [`RBTree::verify`](crate::RBTree::verify).
///
/// Positions are reported as the zero-based in-order index of the offending element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Violation {
    /// The root node is red.
    RedRoot,
    /// The root node has a parent link.
    RootParent,
    /// A red node has a red child.
    RedRed { index: usize },
    /// A path to a missing child crosses a different number of black nodes than the leftmost path.
    BlackHeight { index: usize, expected: usize, found: usize },
    /// A child's key is out of order with respect to its parent.
    Order { index: usize },
    /// A child's parent link does not point back at its parent.
    ParentLink { index: usize },
    /// The cached minimum does not match the leftmost node.
    Leftmost,
    /// The cached maximum does not match the rightmost node.
    Rightmost,
    /// The element count does not match the number of reachable nodes.
    Length { expected: usize, found: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Violation::RedRoot => f.write_str("root node is red"),
            Violation::RootParent => f.write_str("root node has a parent link"),
            Violation::RedRed {
                index,
            } => write!(f, "red node at index {index} has a red child"),
            Violation::BlackHeight {
                index,
                expected,
                found,
            } => write!(f, "black height below index {index} is {found}, expected {expected}"),
            Violation::Order {
                index,
            } => write!(f, "child of node at index {index} is out of order"),
            Violation::ParentLink {
                index,
            } => write!(f, "child of node at index {index} has a stale parent link"),
            Violation::Leftmost => f.write_str("cached minimum is not the leftmost node"),
            Violation::Rightmost => f.write_str("cached maximum is not the rightmost node"),
            Violation::Length {
                expected,
                found,
            } => write!(f, "tree reports {expected} elements but {found} are reachable"),
        }
    }
}

impl core::error::Error for Violation {}

/// The error returned by [`RBMap::at`](crate::RBMap::at) when the key is absent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found in map")
    }
}

impl core::error::Error for KeyNotFound {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(AllocError::CapacityOverflow.to_string(), "node capacity exceeds the maximum tree size");
        assert_eq!(
            Violation::BlackHeight {
                index: 3,
                expected: 2,
                found: 1
            }
            .to_string(),
            "black height below index 3 is 1, expected 2"
        );
        assert_eq!(Violation::RootParent.to_string(), "root node has a parent link");
        assert_eq!(KeyNotFound.to_string(), "key not found in map");
    }
}

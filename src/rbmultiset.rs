use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::RangeBounds;

use crate::compare::{Compare, Identity, Natural};
use crate::rbtree::{IntoIter, Iter, Pos, RBTree, Range};
use crate::{AllocError, Violation};

/// An ordered collection of values that may repeat, based on a red-black tree.
///
/// Equivalent values are kept next to each other in the order they were inserted.
///
/// # Examples
///
/// ```
/// use wabi_rbtree::RBMultiSet;
///
/// let mut bag = RBMultiSet::new();
/// bag.insert(1);
/// bag.insert(1);
/// bag.insert(5);
/// bag.insert(1);
///
/// assert_eq!(bag.len(), 4);
/// assert_eq!(bag.count(&1), 3);
/// assert_eq!(bag.remove_one(&1), Some(1));
/// assert_eq!(bag.remove_all(&1), 2);
/// assert!(bag.iter().copied().eq([5]));
/// ```
pub struct RBMultiSet<T, C = Natural> {
    tree: RBTree<T, Identity, C>,
}

impl<T> RBMultiSet<T> {
    /// Makes a new, empty `RBMultiSet` ordered by [`Natural`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_compare(Natural)
    }
}

impl<T, C> RBMultiSet<T, C> {
    /// Makes a new, empty `RBMultiSet` ordered by `compare`.
    #[must_use]
    pub const fn with_compare(compare: C) -> Self {
        RBMultiSet {
            tree: RBTree::with_compare(compare),
        }
    }

    /// Returns the number of elements, counting repeats.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the collection contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator that visits the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Returns the first (smallest) element.
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the last (largest) element.
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Swaps the contents of two collections in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// The underlying tree, for position-based access.
    pub fn as_tree(&self) -> &RBTree<T, Identity, C> {
        &self.tree
    }

    /// Removes the element at `pos` (obtained from [`as_tree`](RBMultiSet::as_tree)) and returns
    /// it. Unlike [`remove_one`](RBMultiSet::remove_one), this can pick any of several
    /// equivalent elements.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position or no longer addresses an element.
    pub fn erase(&mut self, pos: Pos) -> T {
        self.tree.erase(pos)
    }
}

impl<T, C: Compare<T>> RBMultiSet<T, C> {
    /// Adds a value after every equivalent value already present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) {
        self.tree.insert_equal(value);
    }

    /// Adds a value using `hint` as a guess for the element that will follow it.
    pub fn insert_hint(&mut self, hint: Pos, value: T) -> Pos {
        self.tree.insert_equal_hint(hint, value)
    }

    /// Fallible [`insert`](RBMultiSet::insert).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if no room can be made for the value; the collection is unchanged.
    pub fn try_insert(&mut self, value: T) -> Result<(), AllocError> {
        self.tree.try_insert_equal(value).map(|_| ())
    }

    /// Counts the elements equivalent to `value`.
    ///
    /// # Complexity
    ///
    /// O(log n + count)
    pub fn count(&self, value: &T) -> usize {
        self.tree.count(value)
    }

    /// Returns `true` if at least one element is equivalent to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Gets an iterator over the elements equivalent to `value`, in insertion order.
    pub fn equal_range(&self, value: &T) -> Range<'_, T> {
        let (first, last) = self.tree.equal_range(value);
        self.tree.range(first, last)
    }

    /// Gets an iterator over the elements within `range`, in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are excluded.
    pub fn range<R: RangeBounds<T>>(&self, range: R) -> Range<'_, T> {
        self.tree.key_range(range)
    }

    /// Returns the first element not less than `value`.
    pub fn lower_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.lower_bound(value))
    }

    /// Returns the first element greater than `value`.
    pub fn upper_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.upper_bound(value))
    }

    /// Removes the earliest-inserted element equivalent to `value` and returns it.
    pub fn remove_one(&mut self, value: &T) -> Option<T> {
        let pos = self.tree.find(value);
        (!pos.is_end()).then(|| self.tree.erase(pos))
    }

    /// Removes every element equivalent to `value`. Returns how many were removed.
    pub fn remove_all(&mut self, value: &T) -> usize {
        self.tree.erase_key(value)
    }

    /// Retains only the elements specified by the predicate, visiting them in ascending order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut pos = self.tree.begin();
        while !pos.is_end() {
            let next = self.tree.next_pos(pos);
            if !f(&self.tree[pos]) {
                self.tree.erase(pos);
            }
            pos = next;
        }
    }

    /// Checks the invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn verify(&self) -> Result<(), Violation> {
        self.tree.verify()
    }
}

impl<T: Clone, C: Clone> Clone for RBMultiSet<T, C> {
    fn clone(&self) -> Self {
        RBMultiSet {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<T: Hash, C> Hash for RBMultiSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<T: PartialEq, C> PartialEq for RBMultiSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for RBMultiSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for RBMultiSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<T: Ord, C> Ord for RBMultiSet<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RBMultiSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<T, C: Default> Default for RBMultiSet<T, C> {
    fn default() -> Self {
        RBMultiSet::with_compare(C::default())
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for RBMultiSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut bag = RBMultiSet::with_compare(C::default());
        bag.extend(iter);
        bag
    }
}

impl<T, C: Compare<T>> Extend<T> for RBMultiSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend_equal(iter);
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for RBMultiSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.tree.extend_equal(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBMultiSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T, C> IntoIterator for &'a RBMultiSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for RBMultiSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}

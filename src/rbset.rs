use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::RangeBounds;

use crate::compare::{Compare, Identity, Natural};
use crate::rbtree::{Pos, RBTree};
use crate::{AllocError, Violation};

pub use crate::rbtree::{IntoIter, Iter, Range};

/// An ordered set of unique values, based on a red-black tree.
///
/// Values are ordered by the comparator `C` (by default their [`Ord`] implementation, see
/// [`Natural`]). Inserting a value equivalent to one already present leaves the set unchanged.
///
/// It is a logic error for a value to be modified in such a way that its ordering relative to any
/// other value changes while it is in the set. The behavior resulting from such a logic error is
/// not specified, but will be encapsulated to the `RBSet` that observed it and not result in
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use wabi_rbtree::RBSet;
///
/// let mut books = RBSet::new();
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
///
/// assert!(books.contains(&"The Odyssey"));
/// assert!(!books.insert("The Odyssey"));
/// assert!(books.remove(&"The Odyssey"));
/// assert_eq!(books.first(), Some(&"A Dance With Dragons"));
/// ```
pub struct RBSet<T, C = Natural> {
    tree: RBTree<T, Identity, C>,
}

impl<T> RBSet<T> {
    /// Makes a new, empty `RBSet` ordered by [`Natural`].
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_compare(Natural)
    }
}

impl<T, C> RBSet<T, C> {
    /// Makes a new, empty `RBSet` ordered by `compare`.
    #[must_use]
    pub const fn with_compare(compare: C) -> Self {
        RBSet {
            tree: RBTree::with_compare(compare),
        }
    }

    /// Returns the number of elements in the set.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator that visits the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Returns a reference to the first (smallest) element.
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns a reference to the last (largest) element.
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Removes and returns the first element.
    pub fn pop_first(&mut self) -> Option<T> {
        let begin = self.tree.begin();
        (!begin.is_end()).then(|| self.tree.erase(begin))
    }

    /// Removes and returns the last element.
    pub fn pop_last(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let last = self.tree.prev_pos(self.tree.end());
        Some(self.tree.erase(last))
    }

    /// Swaps the contents of two sets in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// The underlying tree, for position-based access.
    pub fn as_tree(&self) -> &RBTree<T, Identity, C> {
        &self.tree
    }

    /// Removes the element at `pos` (obtained from [`as_tree`](RBSet::as_tree)) and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position or no longer addresses an element.
    pub fn erase(&mut self, pos: Pos) -> T {
        self.tree.erase(pos)
    }
}

impl<T, C: Compare<T>> RBSet<T, C> {
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. An equivalent value already present is left
    /// untouched and `value` is dropped.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert_unique(value).1
    }

    /// Adds a value using `hint` (obtained from [`as_tree`](RBSet::as_tree)) as a guess for the
    /// element that will follow it. Returns the position of the value in the set.
    pub fn insert_hint(&mut self, hint: Pos, value: T) -> Pos {
        self.tree.insert_unique_hint(hint, value)
    }

    /// Fallible [`insert`](RBSet::insert).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if no room can be made for the value; the set is unchanged.
    pub fn try_insert(&mut self, value: T) -> Result<bool, AllocError> {
        self.tree.try_insert_unique(value).map(|(_, inserted)| inserted)
    }

    /// Returns `true` if the set contains a value equivalent to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Returns a reference to the stored value equivalent to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.find(value))
    }

    /// Removes a value from the set. Returns whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.tree.erase_key(value) > 0
    }

    /// Removes and returns the stored value equivalent to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let pos = self.tree.find(value);
        (!pos.is_end()).then(|| self.tree.erase(pos))
    }

    /// Returns the first element not less than `value`.
    pub fn lower_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.lower_bound(value))
    }

    /// Returns the first element greater than `value`.
    pub fn upper_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.upper_bound(value))
    }

    /// Gets an iterator over the elements within `range`, in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBSet;
    ///
    /// let set = RBSet::from([3, 5, 8]);
    /// assert!(set.range(4..).copied().eq([5, 8]));
    /// ```
    pub fn range<R: RangeBounds<T>>(&self, range: R) -> Range<'_, T> {
        self.tree.key_range(range)
    }

    /// Retains only the elements specified by the predicate, visiting them in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBSet;
    ///
    /// let mut set: RBSet<i32> = (0..8).collect();
    /// set.retain(|&k| k % 2 == 0);
    /// assert!(set.iter().copied().eq([0, 2, 4, 6]));
    /// ```
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

impl<T: Clone, C: Clone> Clone for RBSet<T, C> {
    fn clone(&self) -> Self {
        RBSet {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<T: Hash, C> Hash for RBSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<T: PartialEq, C> PartialEq for RBSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for RBSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for RBSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<T: Ord, C> Ord for RBSet<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RBSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for RBSet<T, C> {
    fn default() -> Self {
        RBSet::with_compare(C::default())
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for RBSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RBSet::with_compare(C::default());
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>> Extend<T> for RBSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend_unique(iter);
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for RBSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.tree.extend_unique(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T, C> IntoIterator for &'a RBSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for RBSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}

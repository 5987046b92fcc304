use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Bound, Index, IndexMut, RangeBounds};

use log::{debug, trace};

use crate::compare::{Compare, Identity, KeyOf, Natural};
use crate::raw::{Direction, Handle, RawRBTree};
use crate::{AllocError, Violation};

mod hint;
mod iter;

pub use iter::{IntoIter, Iter, Range};

/// A position inside an [`RBTree`]: either an element or the one-past-the-end position.
///
/// Positions are cheap `Copy` tokens. A position stays valid until the element it points at is
/// erased; erasing *other* elements never moves it. Passing a position to a tree other than the
/// one that produced it is a logic error (it panics or addresses an unrelated element, but never
/// causes undefined behavior).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Pos(Option<Handle>);

impl Pos {
    /// The one-past-the-end position shared by every tree.
    pub const END: Pos = Pos(None);

    /// Returns `true` if this is the end position.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }
}

/// An ordered search tree balanced with the red-black scheme.
///
/// `RBTree` is the engine behind [`RBSet`](crate::RBSet), [`RBMultiSet`](crate::RBMultiSet),
/// [`RBMap`](crate::RBMap) and [`RBMultiMap`](crate::RBMultiMap). It stores values of type `V`,
/// orders them by the key `X` extracts from each value, and compares keys with `C`:
///
/// - `insert_unique` refuses a value whose key is already present;
/// - `insert_equal` always inserts, placing the value after every element with an equivalent
///   key, so equal runs iterate in insertion order.
///
/// Elements are addressed by [`Pos`]itions, mirroring a bidirectional cursor: [`begin`] and
/// [`end`] are O(1), and [`next_pos`]/[`prev_pos`] are amortized O(1) over a full traversal.
///
/// [`begin`]: RBTree::begin
/// [`end`]: RBTree::end
/// [`next_pos`]: RBTree::next_pos
/// [`prev_pos`]: RBTree::prev_pos
///
/// # Examples
///
/// ```
/// use wabi_rbtree::RBTree;
///
/// let mut tree: RBTree<i32> = RBTree::new();
/// for value in [1, 2, 0] {
///     tree.insert_unique(value);
/// }
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [0, 1, 2]);
///
/// let (pos, inserted) = tree.insert_unique(1);
/// assert!(!inserted);
/// assert_eq!(tree.get(pos), Some(&1));
/// assert_eq!(tree.len(), 3);
///
/// tree.insert_equal(1);
/// assert_eq!(tree.count(&1), 2);
/// assert!(tree.is_valid());
/// ```
pub struct RBTree<V, X = Identity, C = Natural> {
    raw: RawRBTree<V>,
    compare: C,
    _key: PhantomData<fn() -> X>,
}

impl<V, X, C: Default> RBTree<V, X, C> {
    /// Makes a new, empty tree with the default comparator.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::with_compare(C::default())
    }

    /// Makes a new, empty tree with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTree {
            raw: RawRBTree::with_capacity(capacity),
            compare: C::default(),
            _key: PhantomData,
        }
    }
}

impl<V, X, C> RBTree<V, X, C> {
    /// Makes a new, empty tree ordered by `compare`.
    #[must_use]
    pub const fn with_compare(compare: C) -> Self {
        RBTree {
            raw: RawRBTree::new(),
            compare,
            _key: PhantomData,
        }
    }

    /// Returns the comparator.
    pub fn key_comp(&self) -> &C {
        &self.compare
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The largest number of elements a tree can ever hold.
    #[must_use]
    pub const fn max_size() -> usize {
        Handle::MAX
    }

    /// Returns the number of elements the tree can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the capacity would exceed [`max_size`](RBTree::max_size) or the
    /// allocator fails. The tree is unchanged in that case.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.raw.try_reserve(additional)
    }

    /// Position of the first (smallest) element, or [`Pos::END`] if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn begin(&self) -> Pos {
        Pos(self.raw.leftmost())
    }

    /// The one-past-the-end position.
    pub fn end(&self) -> Pos {
        Pos::END
    }

    /// Returns the position following `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, amortized O(1) over a full traversal.
    pub fn next_pos(&self, pos: Pos) -> Pos {
        let Pos(Some(handle)) = pos else {
            panic!("`RBTree::next_pos()` - cannot advance past the end!");
        };
        Pos(self.raw.successor(handle))
    }

    /// Returns the position preceding `pos`. Stepping back from [`end`](RBTree::end) lands on the
    /// last element.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is [`begin`](RBTree::begin).
    pub fn prev_pos(&self, pos: Pos) -> Pos {
        let prev = match pos.0 {
            None => self.raw.rightmost(),
            Some(handle) => self.raw.predecessor(handle),
        };
        assert!(prev.is_some(), "`RBTree::prev_pos()` - cannot step before the beginning!");
        Pos(prev)
    }

    /// Returns the element at `pos`, or `None` for the end position.
    pub fn get(&self, pos: Pos) -> Option<&V> {
        pos.0.map(|h| self.raw.value(h))
    }

    /// Returns the element at `pos` mutably, or `None` for the end position.
    ///
    /// It is a logic error to change the element's key in a way that changes its order.
    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut V> {
        pos.0.map(|h| self.raw.value_mut(h))
    }

    /// Returns the smallest element.
    pub fn first(&self) -> Option<&V> {
        self.get(self.begin())
    }

    /// Returns the largest element.
    pub fn last(&self) -> Option<&V> {
        self.raw.rightmost().map(|h| self.raw.value(h))
    }

    /// Gets an iterator over the elements in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBTree;
    ///
    /// let mut tree: RBTree<char> = RBTree::new();
    /// tree.extend_equal(['b', 'c', 'a']);
    /// assert_eq!(tree.iter().rev().collect::<String>(), "cba");
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the elements in `[first, last)`.
    ///
    /// `first` must not come after `last`.
    pub fn range(&self, first: Pos, last: Pos) -> Range<'_, V> {
        Range::new(&self.raw, first.0, last.0)
    }

    /// Erases the element at `pos` and returns it.
    ///
    /// Every other position stays valid.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position or does not address a live element.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, pos: Pos) -> V {
        let Pos(Some(handle)) = pos else {
            panic!("`RBTree::erase()` - cannot erase the end position!");
        };
        self.raw.erase(handle)
    }

    /// Erases the elements in `[first, last)` and returns how many were removed.
    ///
    /// Erasing `[begin, end)` drops the whole tree at once without rebalancing.
    pub fn erase_range(&mut self, first: Pos, last: Pos) -> usize {
        if first == self.begin() && last.is_end() {
            trace!("erase_range: whole tree, clearing {} nodes", self.len());
            let removed = self.len();
            self.clear();
            return removed;
        }

        let mut removed = 0;
        let mut current = first;
        while current != last {
            let next = self.next_pos(current);
            self.erase(current);
            current = next;
            removed += 1;
        }
        removed
    }

    /// Removes every element.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        trace!("clear: dropping {} nodes", self.len());
        self.raw.clear();
    }

    /// Swaps the contents (and comparators) of two trees in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        trace!("swap: {} <-> {} elements", self.len(), other.len());
        self.raw.swap(&mut other.raw);
        core::mem::swap(&mut self.compare, &mut other.compare);
    }

    /// Like [`Clone::clone`], but reports allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if storage for the copy cannot be obtained; nothing is leaked.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        V: Clone,
        C: Clone,
    {
        trace!("try_clone: copying {} nodes", self.len());
        Ok(RBTree {
            raw: self.raw.try_clone()?,
            compare: self.compare.clone(),
            _key: PhantomData,
        })
    }
}

impl<V, X, C> RBTree<V, X, C>
where
    X: KeyOf<V>,
    C: Compare<X::Key>,
{
    #[inline]
    fn key(&self, handle: Handle) -> &X::Key {
        X::key_of(self.raw.value(handle))
    }

    /// Descends to the empty slot where a value with `key` is linked; ties go right so the value
    /// lands after every equivalent element.
    fn insertion_slot(&self, key: &X::Key) -> (Option<Handle>, Direction) {
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            parent = Some(handle);
            dir = if self.compare.less(key, self.key(handle)) {
                Direction::Left
            } else {
                Direction::Right
            };
            current = self.raw.node(handle).child(dir);
        }
        (parent, dir)
    }

    /// Finds the slot for a unique insertion, or the existing element with an equivalent key.
    ///
    /// The only possible equivalent element is the in-order predecessor of the slot, so one extra
    /// comparison settles it.
    fn unique_slot(&self, key: &X::Key) -> Result<(Option<Handle>, Direction), Handle> {
        let (parent, dir) = self.insertion_slot(key);
        let before = match (parent, dir) {
            (None, _) => None,
            (Some(p), Direction::Right) => Some(p),
            (Some(p), Direction::Left) if Some(p) == self.raw.leftmost() => None,
            (Some(p), Direction::Left) => self.raw.predecessor(p),
        };
        match before {
            Some(b) if !self.compare.less(self.key(b), key) => Err(b),
            _ => Ok((parent, dir)),
        }
    }

    /// Inserts `value` unless an element with an equivalent key exists.
    ///
    /// Returns the position of the inserted element and `true`, or the position of the existing
    /// element and `false` (in which case `value` is dropped).
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_unique(&mut self, value: V) -> (Pos, bool) {
        match self.unique_slot(X::key_of(&value)) {
            Err(existing) => (Pos(Some(existing)), false),
            Ok((parent, dir)) => (Pos(Some(self.raw.link(parent, dir, value))), true),
        }
    }

    /// Fallible [`insert_unique`](RBTree::insert_unique).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if no node can be allocated; the tree is unchanged.
    pub fn try_insert_unique(&mut self, value: V) -> Result<(Pos, bool), AllocError> {
        match self.unique_slot(X::key_of(&value)) {
            Err(existing) => Ok((Pos(Some(existing)), false)),
            Ok((parent, dir)) => {
                self.raw.try_reserve(1)?;
                Ok((Pos(Some(self.raw.link(parent, dir, value))), true))
            }
        }
    }

    /// Inserts `value` after every element with an equivalent key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_equal(&mut self, value: V) -> Pos {
        let (parent, dir) = self.insertion_slot(X::key_of(&value));
        Pos(Some(self.raw.link(parent, dir, value)))
    }

    /// Fallible [`insert_equal`](RBTree::insert_equal).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if no node can be allocated; the tree is unchanged.
    pub fn try_insert_equal(&mut self, value: V) -> Result<Pos, AllocError> {
        let (parent, dir) = self.insertion_slot(X::key_of(&value));
        self.raw.try_reserve(1)?;
        Ok(Pos(Some(self.raw.link(parent, dir, value))))
    }

    /// Inserts every value with [`insert_unique`](RBTree::insert_unique) semantics.
    pub fn extend_unique<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert_unique(value);
        }
    }

    /// Inserts every value with [`insert_equal`](RBTree::insert_equal) semantics.
    pub fn extend_equal<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert_equal(value);
        }
    }

    /// Position of the first element whose key is not less than `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound(&self, key: &X::Key) -> Pos {
        let mut candidate = None;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            if self.compare.less(self.key(handle), key) {
                current = self.raw.node(handle).right();
            } else {
                candidate = Some(handle);
                current = self.raw.node(handle).left();
            }
        }
        Pos(candidate)
    }

    /// Position of the first element whose key is greater than `key`.
    pub fn upper_bound(&self, key: &X::Key) -> Pos {
        let mut candidate = None;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            if self.compare.less(key, self.key(handle)) {
                candidate = Some(handle);
                current = self.raw.node(handle).left();
            } else {
                current = self.raw.node(handle).right();
            }
        }
        Pos(candidate)
    }

    /// Position of the first element with a key equivalent to `key`, or [`Pos::END`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBTree;
    ///
    /// let mut tree: RBTree<i32> = RBTree::new();
    /// tree.extend_equal([4, 2, 6]);
    /// assert_eq!(tree.get(tree.find(&2)), Some(&2));
    /// assert!(tree.find(&5).is_end());
    /// ```
    pub fn find(&self, key: &X::Key) -> Pos {
        let candidate = self.lower_bound(key);
        match candidate.0 {
            Some(handle) if !self.compare.less(key, self.key(handle)) => candidate,
            _ => Pos::END,
        }
    }

    /// Returns `true` if an element with a key equivalent to `key` exists.
    pub fn contains(&self, key: &X::Key) -> bool {
        !self.find(key).is_end()
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    pub fn equal_range(&self, key: &X::Key) -> (Pos, Pos) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Gets an iterator over the elements whose keys fall within `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if the start bound orders after the end bound, or if both bounds are excluded and
    /// equivalent.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::Bound::{Excluded, Included};
    /// use wabi_rbtree::RBTree;
    ///
    /// let mut tree: RBTree<i32> = RBTree::new();
    /// tree.extend_unique(0..10);
    /// assert!(tree.key_range(3..6).copied().eq([3, 4, 5]));
    /// assert!(tree.key_range((Excluded(7), Included(9))).copied().eq([8, 9]));
    /// assert!(tree.key_range(..2).copied().eq([0, 1]));
    /// ```
    pub fn key_range<R>(&self, bounds: R) -> Range<'_, V>
    where
        R: RangeBounds<X::Key>,
    {
        if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
            (bounds.start_bound(), bounds.end_bound())
        {
            let both_excluded =
                matches!(bounds.start_bound(), Bound::Excluded(_)) && matches!(bounds.end_bound(), Bound::Excluded(_));
            let valid = if both_excluded {
                self.compare.less(start, end)
            } else {
                !self.compare.less(end, start)
            };
            assert!(valid, "range start is greater than range end in RBTree");
        }

        let first = match bounds.start_bound() {
            Bound::Included(start) => self.lower_bound(start),
            Bound::Excluded(start) => self.upper_bound(start),
            Bound::Unbounded => self.begin(),
        };
        let last = match bounds.end_bound() {
            Bound::Included(end) => self.upper_bound(end),
            Bound::Excluded(end) => self.lower_bound(end),
            Bound::Unbounded => self.end(),
        };
        self.range(first, last)
    }

    /// Counts the elements with a key equivalent to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n + count)
    pub fn count(&self, key: &X::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.range(first, last).count()
    }

    /// Erases every element with a key equivalent to `key` and returns how many there were.
    pub fn erase_key(&mut self, key: &X::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.erase_range(first, last)
    }

    /// Checks every structural invariant: coloring, black heights, key order, parent links and
    /// the cached extremes.
    ///
    /// This walks the whole tree and is meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn verify(&self) -> Result<(), Violation> {
        let result = self.raw.verify_structure().and_then(|()| self.verify_order());
        if let Err(violation) = &result {
            debug!("red-black tree verification failed: {violation}");
        }
        result
    }

    /// Returns `true` if [`verify`](RBTree::verify) finds no violation.
    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    // The in-order sequence is fixed by the links, so checking neighbours covers BST order.
    fn verify_order(&self) -> Result<(), Violation> {
        let mut index = 0;
        let mut current = self.raw.leftmost();
        while let Some(handle) = current {
            let next = self.raw.successor(handle);
            if let Some(next) = next {
                if self.compare.less(self.key(next), self.key(handle)) {
                    return Err(Violation::Order {
                        index,
                    });
                }
            }
            index += 1;
            current = next;
        }
        Ok(())
    }
}

impl<V: Clone, X, C: Clone> Clone for RBTree<V, X, C> {
    fn clone(&self) -> Self {
        trace!("clone: copying {} nodes", self.len());
        RBTree {
            raw: self.raw.clone(),
            compare: self.compare.clone(),
            _key: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // Build the copy first so a panicking `V::clone` leaves `self` untouched.
        *self = source.clone();
    }
}

impl<V: Hash, X, C> Hash for RBTree<V, X, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<V: PartialEq, X, C> PartialEq for RBTree<V, X, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<V: Eq, X, C> Eq for RBTree<V, X, C> {}

impl<V: PartialOrd, X, C> PartialOrd for RBTree<V, X, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<V: Ord, X, C> Ord for RBTree<V, X, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<V: fmt::Debug, X, C> fmt::Debug for RBTree<V, X, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<V, X, C: Default> Default for RBTree<V, X, C> {
    fn default() -> Self {
        RBTree::new()
    }
}

impl<V, X, C> Index<Pos> for RBTree<V, X, C> {
    type Output = V;

    /// Returns the element at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position.
    fn index(&self, pos: Pos) -> &V {
        match self.get(pos) {
            Some(value) => value,
            None => panic!("`RBTree::index()` - `pos` is the end position!"),
        }
    }
}

impl<V, X, C> IndexMut<Pos> for RBTree<V, X, C> {
    fn index_mut(&mut self, pos: Pos) -> &mut V {
        match self.get_mut(pos) {
            Some(value) => value,
            None => panic!("`RBTree::index_mut()` - `pos` is the end position!"),
        }
    }
}

impl<'a, V, X, C> IntoIterator for &'a RBTree<V, X, C> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V, X, C> IntoIterator for RBTree<V, X, C> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    /// Gets an owning iterator over the elements in order.
    fn into_iter(mut self) -> IntoIter<V> {
        IntoIter::new(self.raw.drain_to_vec())
    }
}

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::RangeBounds;

use crate::compare::{Compare, First, Natural};
use crate::rbmap::{IntoIter, Iter, Keys, PairTree, Range, Values};
use crate::rbtree::{self, Pos, RBTree};
use crate::{AllocError, Violation};

/// An ordered map that allows several values per key, based on a red-black tree.
///
/// Values stored under equivalent keys are kept in the order they were inserted.
///
/// # Examples
///
/// ```
/// use wabi_rbtree::RBMultiMap;
///
/// let mut tags = RBMultiMap::new();
/// tags.insert("fruit", "apple");
/// tags.insert("veg", "leek");
/// tags.insert("fruit", "pear");
///
/// assert_eq!(tags.count(&"fruit"), 2);
/// assert!(tags.get_all(&"fruit").copied().eq(["apple", "pear"]));
/// assert_eq!(tags.remove_all(&"fruit"), 2);
/// assert_eq!(tags.len(), 1);
/// ```
pub struct RBMultiMap<K, V, C = Natural> {
    tree: PairTree<K, V, C>,
}

/// An iterator over the values stored under one key of an `RBMultiMap`, in insertion order.
///
/// This `struct` is created by the [`get_all`] method on [`RBMultiMap`].
///
/// [`get_all`]: RBMultiMap::get_all
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct GetAll<'a, K, V> {
    inner: rbtree::Range<'a, (K, V)>,
}

impl<K, V> RBMultiMap<K, V> {
    /// Makes a new, empty `RBMultiMap` ordered by [`Natural`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_compare(Natural)
    }
}

impl<K, V, C> RBMultiMap<K, V, C> {
    /// Makes a new, empty `RBMultiMap` ordered by `compare`.
    #[must_use]
    pub const fn with_compare(compare: C) -> Self {
        RBMultiMap {
            tree: RBTree::with_compare(compare),
        }
    }

    /// Returns the number of key-value pairs, counting repeated keys.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no entries.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator over all entries, sorted by key, with repeated keys in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.tree.iter())
    }

    /// Gets an iterator over the keys, one per entry.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns the first key-value pair.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    /// Returns the last key-value pair.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(k, v)| (k, v))
    }

    /// Removes and returns the first entry: the earliest value under the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let begin = self.tree.begin();
        (!begin.is_end()).then(|| self.tree.erase(begin))
    }

    /// Removes and returns the last entry: the latest value under the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        let last = self.tree.prev_pos(self.tree.end());
        Some(self.tree.erase(last))
    }

    /// Swaps the contents of two maps in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// The underlying tree of `(K, V)` pairs, for position-based access.
    pub fn as_tree(&self) -> &RBTree<(K, V), First<K, V>, C> {
        &self.tree
    }

    /// Removes the entry at `pos` (obtained from [`as_tree`](RBMultiMap::as_tree)) and returns
    /// it. Positions of the other entries stay valid.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position or no longer addresses an entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMultiMap;
    ///
    /// let mut shifts = RBMultiMap::from([("mon", "ann"), ("mon", "bo"), ("tue", "cy")]);
    /// let bo = shifts.as_tree().next_pos(shifts.as_tree().find(&"mon"));
    /// assert_eq!(shifts.erase(bo), ("mon", "bo"));
    /// assert!(shifts.get_all(&"mon").copied().eq(["ann"]));
    /// ```
    pub fn erase(&mut self, pos: Pos) -> (K, V) {
        self.tree.erase(pos)
    }

    /// Removes the entries in `[first, last)` and returns how many were removed.
    pub fn erase_range(&mut self, first: Pos, last: Pos) -> usize {
        self.tree.erase_range(first, last)
    }
}

impl<K, V, C: Compare<K>> RBMultiMap<K, V, C> {
    /// Appends a value under `key`, after any values already stored under an equivalent key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) {
        self.tree.insert_equal((key, value));
    }

    /// Appends a value using `hint` (obtained from [`as_tree`](RBMultiMap::as_tree)) as a guess
    /// for the entry that will follow it. The resulting order is the one
    /// [`insert`](RBMultiMap::insert) would give; only the search cost depends on the hint.
    pub fn insert_hint(&mut self, hint: Pos, key: K, value: V) -> Pos {
        self.tree.insert_equal_hint(hint, (key, value))
    }

    /// Fallible [`insert`](RBMultiMap::insert).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if no room can be made for the entry; the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), AllocError> {
        self.tree.try_insert_equal((key, value)).map(|_| ())
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(self.tree.find(key)).map(|(_, v)| v)
    }

    /// Returns the first value stored under `key`, mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.tree.find(key);
        self.tree.get_mut(pos).map(|(_, v)| v)
    }

    /// Gets an iterator over every value stored under `key`, in insertion order.
    ///
    /// # Complexity
    ///
    /// O(log n) to locate the run, then amortized O(1) per value.
    pub fn get_all(&self, key: &K) -> GetAll<'_, K, V> {
        let (first, last) = self.tree.equal_range(key);
        GetAll {
            inner: self.tree.range(first, last),
        }
    }

    /// Counts the values stored under `key`.
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Returns `true` if at least one value is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Removes the earliest-inserted entry stored under `key` and returns it. Later values under
    /// the same key keep their order.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_one(&mut self, key: &K) -> Option<(K, V)> {
        let pos = self.tree.find(key);
        (!pos.is_end()).then(|| self.tree.erase(pos))
    }

    /// Removes every value stored under `key`. Returns how many were removed.
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.tree.erase_key(key)
    }

    /// Retains only the entries specified by the predicate, visiting them in order. The
    /// predicate may modify the values it keeps.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut pos = self.tree.begin();
        while !pos.is_end() {
            let next = self.tree.next_pos(pos);
            let (key, value) = &mut self.tree[pos];
            if !f(key, value) {
                self.tree.erase(pos);
            }
            pos = next;
        }
    }

    /// Gets an iterator over the entries whose keys fall within `range`.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are excluded.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        Range::new(self.tree.key_range(range))
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

impl<K: Clone, V: Clone, C: Clone> Clone for RBMultiMap<K, V, C> {
    fn clone(&self) -> Self {
        RBMultiMap {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<K: Hash, V: Hash, C> Hash for RBMultiMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBMultiMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for RBMultiMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RBMultiMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C> Ord for RBMultiMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBMultiMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBMultiMap<K, V, C> {
    fn default() -> Self {
        RBMultiMap::with_compare(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RBMultiMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBMultiMap::with_compare(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RBMultiMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.tree.extend_equal(iter);
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBMultiMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBMultiMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBMultiMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        self.tree.into_iter()
    }
}

impl<'a, K, V> Iterator for GetAll<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for GetAll<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> FusedIterator for GetAll<'_, K, V> {}

impl<K, V> Clone for GetAll<'_, K, V> {
    fn clone(&self) -> Self {
        GetAll {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for GetAll<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

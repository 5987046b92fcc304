use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Index, RangeBounds};

use crate::compare::{Compare, First, Natural};
use crate::rbtree::{self, Pos, RBTree};
use crate::{AllocError, KeyNotFound, Violation};

mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

pub(crate) type PairTree<K, V, C> = RBTree<(K, V), First<K, V>, C>;

/// An ordered map based on a red-black tree.
///
/// Each key appears at most once; keys are ordered by the comparator `C` (by default their
/// [`Ord`] implementation, see [`Natural`]). Entries are stored as `(K, V)` pairs in a single
/// [`RBTree`], so iteration visits them in key order.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key changes while it is in the map. The behavior resulting from such a logic error is not
/// specified, but will be encapsulated to the `RBMap` that observed it and not result in undefined
/// behavior.
///
/// # Examples
///
/// ```
/// use wabi_rbtree::RBMap;
///
/// let mut movie_reviews = RBMap::new();
/// movie_reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert("The Godfather", "Very enjoyable.");
///
/// assert!(movie_reviews.contains_key(&"Pulp Fiction"));
/// assert_eq!(movie_reviews.remove(&"The Godfather"), Some("Very enjoyable."));
/// assert!(movie_reviews.at(&"The Blues Brothers").is_err());
///
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
pub struct RBMap<K, V, C = Natural> {
    tree: PairTree<K, V, C>,
}

/// An iterator over the entries of an `RBMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`RBMap`].
///
/// [`iter`]: RBMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: rbtree::Iter<'a, (K, V)>,
}

/// An iterator over the keys of an `RBMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBMap`].
///
/// [`keys`]: RBMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `RBMap`.
///
/// This `struct` is created by the [`values`] method on [`RBMap`].
///
/// [`values`]: RBMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over a sub-range of entries in an `RBMap`.
///
/// This `struct` is created by the [`range`] method on [`RBMap`].
///
/// [`range`]: RBMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V> {
    inner: rbtree::Range<'a, (K, V)>,
}

/// An owning iterator over the entries of an `RBMap`, in key order.
pub type IntoIter<K, V> = rbtree::IntoIter<(K, V)>;

impl<K, V> RBMap<K, V> {
    /// Makes a new, empty `RBMap` ordered by [`Natural`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut map = RBMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_compare(Natural)
    }
}

impl<K, V, C> RBMap<K, V, C> {
    /// Makes a new, empty `RBMap` ordered by `compare`.
    #[must_use]
    pub const fn with_compare(compare: C) -> Self {
        RBMap {
            tree: RBTree::with_compare(compare),
        }
    }

    /// Returns the number of entries in the map.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no entries.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let map = RBMap::from([(3, "c"), (2, "b"), (1, "a")]);
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.tree.iter())
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns the first key-value pair in the map.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    /// Returns the last key-value pair in the map.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(k, v)| (k, v))
    }

    /// Removes and returns the first entry in the map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let begin = self.tree.begin();
        (!begin.is_end()).then(|| self.tree.erase(begin))
    }

    /// Removes and returns the last entry in the map.
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

    /// Removes the entry at `pos` (obtained from [`as_tree`](RBMap::as_tree)) and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position or no longer addresses an entry.
    pub fn erase(&mut self, pos: Pos) -> (K, V) {
        self.tree.erase(pos)
    }
}

impl<K, V, C: Compare<K>> RBMap<K, V, C> {
    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut count: RBMap<&str, usize> = RBMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count[&"a"], 3);
    /// assert_eq!(count[&"b"], 2);
    /// assert_eq!(count[&"c"], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n); inserting through a vacant entry afterwards is amortized O(1).
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        let pos = self.tree.lower_bound(&key);
        let occupied = self.tree.get(pos).is_some_and(|(found, _)| !self.tree.key_comp().less(&key, found));
        if occupied {
            Entry::Occupied(OccupiedEntry {
                pos,
                tree: &mut self.tree,
            })
        } else {
            Entry::Vacant(VacantEntry {
                key,
                hint: pos,
                tree: &mut self.tree,
            })
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned. If it did, the value is
    /// updated and the old value is returned; the key is not updated.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut map = RBMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut o) => Some(o.insert(value)),
            Entry::Vacant(v) => {
                v.insert(value);
                None
            }
        }
    }

    /// Fallible [`insert`](RBMap::insert).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if a new entry is needed and no room can be made for it; the map is
    /// unchanged in that case.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        match self.entry(key) {
            Entry::Occupied(mut o) => Ok(Some(o.insert(value))),
            Entry::Vacant(v) => {
                v.tree.try_reserve(1)?;
                v.insert(value);
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut map = RBMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(self.tree.find(key)).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.tree.find(key);
        self.tree.get_mut(pos).map(|(_, v)| v)
    }

    /// Returns the stored key-value pair corresponding to the supplied key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(self.tree.find(key)).map(|(k, v)| (k, v))
    }

    /// Range-checked access: returns the value for `key` or a [`KeyNotFound`] error.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if the map has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::{KeyNotFound, RBMap};
    ///
    /// let map = RBMap::from([(1, 'x')]);
    /// assert_eq!(map.at(&1), Ok(&'x'));
    /// assert_eq!(map.at(&2), Err(KeyNotFound));
    /// ```
    pub fn at(&self, key: &K) -> Result<&V, KeyNotFound> {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns the value for `key`, inserting `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut totals: RBMap<&str, u32> = RBMap::new();
    /// *totals.get_or_insert_default("apples") += 3;
    /// *totals.get_or_insert_default("apples") += 4;
    /// assert_eq!(totals[&"apples"], 7);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Removes a key from the map, returning its value if the key was present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let pos = self.tree.find(key);
        (!pos.is_end()).then(|| self.tree.erase(pos))
    }

    /// Gets an iterator over the entries whose keys fall within `range`.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let map = RBMap::from([(3, "a"), (5, "b"), (8, "c")]);
    /// for (&key, &value) in map.range(4..) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(map.range(4..).next(), Some((&5, &"b")));
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        Range::new(self.tree.key_range(range))
    }

    /// Retains only the entries specified by the predicate, visiting them in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut map: RBMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
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

    /// Checks the invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn verify(&self) -> Result<(), Violation> {
        self.tree.verify()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBMap<K, V, C> {
    fn clone(&self) -> Self {
        RBMap {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<K: Hash, V: Hash, C> Hash for RBMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for RBMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RBMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C> Ord for RBMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBMap<K, V, C> {
    fn default() -> Self {
        RBMap::with_compare(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RBMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBMap::with_compare(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RBMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for RBMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V, C: Compare<K>> Index<&K> for RBMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    fn into_iter(self) -> IntoIter<K, V> {
        self.tree.into_iter()
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(inner: rbtree::Iter<'a, (K, V)>) -> Self {
        Iter {
            inner,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Keys {
            inner,
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Values {
            inner,
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Range<'a, K, V> {
    pub(crate) fn new(inner: rbtree::Range<'a, (K, V)>) -> Self {
        Range {
            inner,
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Descending;
    use alloc::vec::Vec;

    #[test]
    fn insert_replaces_value_but_keeps_key() {
        let mut map = RBMap::new();
        assert_eq!(map.insert(1, "a"), None);
        assert_eq!(map.insert(1, "b"), Some("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"b"));
        assert_eq!(map.try_insert(2, "c"), Ok(None));
        assert_eq!(map.verify(), Ok(()));
    }

    #[test]
    fn at_reports_missing_key() {
        let map = RBMap::from([(1, 10), (2, 20)]);
        assert_eq!(map.at(&2), Ok(&20));
        assert_eq!(map.at(&3), Err(KeyNotFound));
    }

    #[test]
    fn get_or_insert_default_inserts_once() {
        let mut map: RBMap<i32, Vec<i32>> = RBMap::new();
        map.get_or_insert_default(5).push(1);
        map.get_or_insert_default(5).push(2);
        map.get_or_insert_default(3).push(3);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&5], [1, 2]);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5]);
    }

    #[test]
    fn keys_values_and_extremes() {
        let map = RBMap::from([(2, 'b'), (1, 'a'), (3, 'c')]);
        assert!(map.keys().copied().eq([1, 2, 3]));
        assert!(map.values().rev().copied().eq(['c', 'b', 'a']));
        assert_eq!(map.first_key_value(), Some((&1, &'a')));
        assert_eq!(map.last_key_value(), Some((&3, &'c')));
        assert_eq!(map.get_key_value(&2), Some((&2, &'b')));
    }

    #[test]
    fn pop_and_remove() {
        let mut map = RBMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
        assert_eq!(map.pop_first(), Some((1, 'a')));
        assert_eq!(map.pop_last(), Some((4, 'd')));
        assert_eq!(map.remove(&2), Some('b'));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.remove_entry(&3), Some((3, 'c')));
        assert!(map.is_empty());
        assert_eq!(map.pop_first(), None);
    }

    #[test]
    fn get_mut_and_retain() {
        let mut map: RBMap<i32, i32> = (0..6).map(|k| (k, k)).collect();
        *map.get_mut(&4).unwrap() = 40;
        map.retain(|&k, v| {
            *v += 1;
            k % 2 == 0
        });
        assert_eq!(map.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(), [(0, 1), (2, 3), (4, 41)]);
    }

    #[test]
    fn descending_keys() {
        let mut map = RBMap::with_compare(Descending);
        map.extend([(1, ()), (3, ()), (2, ())]);
        assert!(map.keys().copied().eq([3, 2, 1]));
        assert!(map.range(..=2).map(|(&k, _)| k).eq([3, 2]));
    }

    #[test]
    fn try_insert_at_capacity_keeps_map() {
        let max = RBTree::<i32>::max_size();
        let len = i32::try_from(max).unwrap();
        let mut map: RBMap<i32, i32> = (0..len).map(|k| (k * 2, k)).collect();
        assert_eq!(map.try_insert(1, 0), Err(AllocError::CapacityOverflow));
        // Replacing a value needs no new node.
        assert_eq!(map.try_insert(2, -1), Ok(Some(1)));
        assert_eq!(map.len(), max);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.verify(), Ok(()));

        assert_eq!(map.remove(&0), Some(0));
        assert_eq!(map.try_insert(1, 0), Ok(None));
        assert_eq!(map.first_key_value(), Some((&1, &0)));
    }

    #[test]
    fn erase_after_upper_bound() {
        let mut map = RBMap::from([(1, 'a'), (3, 'c'), (5, 'e')]);
        let after = map.as_tree().upper_bound(&3);
        assert_eq!(map.erase(after), (5, 'e'));
        assert_eq!(map.last_key_value(), Some((&3, &'c')));
        assert_eq!(map.verify(), Ok(()));
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_missing_key_panics() {
        let map: RBMap<i32, i32> = RBMap::new();
        let _ = map[&1];
    }

    #[test]
    fn debug_as_map() {
        use alloc::format;

        let map = RBMap::from([(2, "b"), (1, "a")]);
        assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
    }
}

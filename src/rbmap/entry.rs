use core::fmt;
use core::mem;

use super::PairTree;
use crate::compare::Compare;
use crate::rbtree::Pos;

/// The slot for one key of an [`RBMap`](crate::RBMap): either holding a value already or
/// waiting for one.
///
/// Returned by [`RBMap::entry`](crate::RBMap::entry). The lookup happens once, when the entry is
/// created; every method below reuses the position it found.
///
/// # Examples
///
/// ```
/// use wabi_rbtree::RBMap;
/// use wabi_rbtree::rbmap::Entry;
///
/// let mut stock: RBMap<&str, u32> = RBMap::new();
/// for item in ["bolt", "nut", "bolt"] {
///     match stock.entry(item) {
///         Entry::Occupied(mut held) => *held.get_mut() += 1,
///         Entry::Vacant(empty) => {
///             empty.insert(1);
///         }
///     }
/// }
/// assert_eq!(stock[&"bolt"], 2);
/// assert_eq!(stock[&"nut"], 1);
/// ```
pub enum Entry<'a, K: 'a, V: 'a, C: 'a> {
    /// No value is stored under the key yet.
    Vacant(VacantEntry<'a, K, V, C>),

    /// A value is stored under the key.
    Occupied(OccupiedEntry<'a, K, V, C>),
}

/// An [`Entry`] whose key is absent from the map.
pub struct VacantEntry<'a, K, V, C> {
    pub(super) key: K,
    // First element ordered after `key`; the new entry is linked right before it.
    pub(super) hint: Pos,
    pub(super) tree: &'a mut PairTree<K, V, C>,
}

/// An [`Entry`] whose key is present in the map.
pub struct OccupiedEntry<'a, K, V, C> {
    pub(super) pos: Pos,
    pub(super) tree: &'a mut PairTree<K, V, C>,
}

impl<'a, K, V, C: Compare<K>> Entry<'a, K, V, C> {
    /// Returns the stored value, first inserting `default` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut ports: RBMap<&str, u16> = RBMap::new();
    /// *ports.entry("http").or_insert(80) += 8000;
    /// assert_eq!(ports.entry("http").or_insert(1), &mut 8080);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with_key(|_| default)
    }

    /// Like [`or_insert`](Entry::or_insert), but only builds the value when the key is absent.
    pub fn or_insert_with<F: FnOnce() -> V>(self, make: F) -> &'a mut V {
        self.or_insert_with_key(|_| make())
    }

    /// Like [`or_insert_with`](Entry::or_insert_with), with the key passed to the builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    ///
    /// let mut lengths: RBMap<&str, usize> = RBMap::new();
    /// lengths.entry("ferris").or_insert_with_key(|name| name.len());
    /// assert_eq!(lengths[&"ferris"], 6);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, make: F) -> &'a mut V {
        match self {
            Entry::Occupied(held) => held.into_mut(),
            Entry::Vacant(empty) => {
                let value = make(&empty.key);
                empty.insert(value)
            }
        }
    }

    /// The key this entry was created for, or the equivalent key already stored.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(held) => held.key(),
            Entry::Vacant(empty) => empty.key(),
        }
    }

    /// Runs `update` on the stored value if there is one, then hands the entry back.
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, update: F) -> Self {
        if let Entry::Occupied(held) = &mut self {
            update(held.get_mut());
        }
        self
    }
}

impl<'a, K, V: Default, C: Compare<K>> Entry<'a, K, V, C> {
    /// Returns the stored value, first inserting `V::default()` if the key is absent.
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with_key(|_| V::default())
    }
}

impl<'a, K, V, C: Compare<K>> VacantEntry<'a, K, V, C> {
    /// The key that [`insert`](VacantEntry::insert) would store.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Gives the key back without touching the map.
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Stores `value` under the entry's key and returns a reference to it.
    ///
    /// # Complexity
    ///
    /// Amortized O(1): the position was found when the entry was created.
    pub fn insert(self, value: V) -> &'a mut V {
        let tree = self.tree;
        let pos = tree.insert_unique_hint(self.hint, (self.key, value));
        &mut tree[pos].1
    }

    /// Stores `value` under the entry's key and returns the now occupied entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    /// use wabi_rbtree::rbmap::Entry;
    ///
    /// let mut scores: RBMap<u8, i32> = RBMap::new();
    /// if let Entry::Vacant(empty) = scores.entry(7) {
    ///     let held = empty.insert_entry(-3);
    ///     assert_eq!((held.key(), held.get()), (&7, &-3));
    /// }
    /// ```
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        let pos = self.tree.insert_unique_hint(self.hint, (self.key, value));
        OccupiedEntry {
            pos,
            tree: self.tree,
        }
    }
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> {
    /// The key stored in the map (not the one passed to `entry`).
    #[must_use]
    pub fn key(&self) -> &K {
        &self.tree[self.pos].0
    }

    /// The stored value.
    #[must_use]
    pub fn get(&self) -> &V {
        &self.tree[self.pos].1
    }

    /// The stored value, mutably, for as long as the entry is borrowed.
    /// Use [`into_mut`](OccupiedEntry::into_mut) to keep the reference after the entry is gone.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.tree[self.pos].1
    }

    /// Consumes the entry, returning a reference to the value tied to the map's borrow.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        let tree = self.tree;
        &mut tree[self.pos].1
    }

    /// Overwrites the stored value and returns the previous one. The key is left as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_rbtree::RBMap;
    /// use wabi_rbtree::rbmap::Entry;
    ///
    /// let mut versions = RBMap::from([("serde", 1)]);
    /// if let Entry::Occupied(mut held) = versions.entry("serde") {
    ///     assert_eq!(held.insert(2), 1);
    /// }
    /// assert_eq!(versions[&"serde"], 2);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Unlinks the entry from the map and returns the stored pair.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.erase(self.pos)
    }

    /// Unlinks the entry from the map and returns the stored value.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Entry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(empty) => fmt::Debug::fmt(empty, f),
            Entry::Occupied(held) => fmt::Debug::fmt(held, f),
        }
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for VacantEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(&self.key).finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OccupiedEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, value) = &self.tree[self.pos];
        f.debug_struct("OccupiedEntry").field("key", key).field("value", value).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::RBMap;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn vacant_then_occupied() {
        let mut map: RBMap<i32, String> = RBMap::new();
        match map.entry(3) {
            Entry::Vacant(empty) => {
                assert_eq!(empty.key(), &3);
                empty.insert(String::from("three"));
            }
            Entry::Occupied(_) => panic!("entry should be vacant"),
        }
        match map.entry(3) {
            Entry::Occupied(mut held) => {
                assert_eq!(held.key(), &3);
                held.get_mut().push('!');
                assert_eq!(held.get(), "three!");
            }
            Entry::Vacant(_) => panic!("entry should be occupied"),
        }
    }

    #[test]
    fn vacant_insert_lands_in_order() {
        let mut map: RBMap<i32, ()> = RBMap::new();
        for key in [50, 10, 40, 20, 30, 0, 60] {
            map.entry(key).or_insert(());
        }
        assert!(map.keys().copied().eq([0, 10, 20, 30, 40, 50, 60]));
        assert_eq!(map.verify(), Ok(()));
    }

    #[test]
    fn occupied_remove() {
        let mut map = RBMap::from([(1, 'a'), (2, 'b')]);
        if let Entry::Occupied(held) = map.entry(1) {
            assert_eq!(held.remove_entry(), (1, 'a'));
        }
        if let Entry::Occupied(held) = map.entry(2) {
            assert_eq!(held.remove(), 'b');
        }
        assert!(map.is_empty());
    }

    #[test]
    fn and_modify_or_insert() {
        let mut map: RBMap<&str, u32> = RBMap::new();
        for word in ["x", "y", "x"] {
            map.entry(word).and_modify(|n| *n += 1).or_insert(1);
        }
        assert_eq!(map[&"x"], 2);
        assert_eq!(map[&"y"], 1);
        assert_eq!(map.entry("z").key(), &"z");
        if let Entry::Vacant(empty) = map.entry("z") {
            assert_eq!(empty.into_key(), "z");
        }
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn or_insert_with_runs_builder_once() {
        let mut map: RBMap<u8, u8> = RBMap::new();
        let mut calls = 0;
        for _ in 0..3 {
            map.entry(1).or_insert_with(|| {
                calls += 1;
                9
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(*map.entry(2).or_default(), 0);
    }

    #[test]
    fn debug_shows_state() {
        let mut map = RBMap::from([(1, 'a')]);
        assert_eq!(format!("{:?}", map.entry(1)), "OccupiedEntry { key: 1, value: 'a' }");
        assert_eq!(format!("{:?}", map.entry(2)), "VacantEntry(2)");
    }
}

//! Ordering and key-extraction policies consumed by [`RBTree`](crate::RBTree).
//!
//! The tree never calls [`Ord`] directly: it asks a [`Compare`] whether one key is less than
//! another, and a [`KeyOf`] policy where the key lives inside a stored value. Sets store the key
//! itself ([`Identity`]); maps store `(K, V)` pairs keyed by the first field ([`First`]).

use core::marker::PhantomData;

/// A strict weak ordering over keys of type `K`.
///
/// Two keys `a` and `b` are *equivalent* when neither `less(a, b)` nor `less(b, a)` holds. It is a
/// logic error for an implementation to be inconsistent (for example, not transitive); the tree
/// stays memory-safe but may return unexpected results.
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Orders keys by their [`Ord`] implementation. The default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: ?Sized + Ord> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Descending;

impl<K: ?Sized + Ord> Compare<K> for Descending {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }
}

/// Adapts a `Fn(&K, &K) -> bool` closure into a [`Compare`].
///
/// # Examples
///
/// ```
/// use wabi_rbtree::{FnCompare, RBSet};
///
/// let mut set = RBSet::with_compare(FnCompare(|a: &i32, b: &i32| a.abs() < b.abs()));
/// set.insert(-3);
/// set.insert(2);
/// assert!(!set.insert(3));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [2, -3]);
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnCompare<F>(pub F);

impl<K: ?Sized, F: Fn(&K, &K) -> bool> Compare<K> for FnCompare<F> {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}

impl<F> core::fmt::Debug for FnCompare<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnCompare(..)")
    }
}

/// Locates the key inside a stored value.
pub trait KeyOf<V> {
    /// The key type the comparator sees.
    type Key: ?Sized;

    /// Borrows the key of `value`.
    fn key_of(value: &V) -> &Self::Key;
}

/// The value is its own key (sets and multisets).
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl<T> KeyOf<T> for Identity {
    type Key = T;

    #[inline]
    fn key_of(value: &T) -> &T {
        value
    }
}

/// The key is the first field of a `(K, V)` pair (maps and multimaps).
pub struct First<K, V>(PhantomData<fn() -> (K, V)>);

// Manual impls avoid the `K: Clone, V: Clone` bounds a derive would add.
impl<K, V> Clone for First<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for First<K, V> {}

impl<K, V> Default for First<K, V> {
    fn default() -> Self {
        First(PhantomData)
    }
}

impl<K, V> core::fmt::Debug for First<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("First")
    }
}

impl<K, V> KeyOf<(K, V)> for First<K, V> {
    type Key = K;

    #[inline]
    fn key_of(value: &(K, V)) -> &K {
        &value.0
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn natural_and_descending_are_mirrors() {
        assert!(Natural.less(&1, &2));
        assert!(!Natural.less(&2, &2));
        assert!(Descending.less(&2, &1));
        assert!(!Descending.less(&1, &1));
    }

    #[test]
    fn fn_compare_forwards_to_closure() {
        let by_len = FnCompare(|a: &&str, b: &&str| a.len() < b.len());
        assert!(by_len.less(&"ab", &"abc"));
        assert!(!by_len.less(&"abc", &"xyz"));
    }

    #[test]
    fn key_extractors() {
        assert_eq!(*Identity::key_of(&5), 5);
        assert_eq!(*First::<u8, &str>::key_of(&(3, "three")), 3);
    }
}

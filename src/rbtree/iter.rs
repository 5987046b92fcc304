use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Handle, RawRBTree};

/// An iterator over the elements of an [`RBTree`](crate::RBTree), in order.
///
/// This `struct` is created by [`RBTree::iter`](crate::RBTree::iter).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, V> {
    raw: &'a RawRBTree<V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(super) fn new(raw: &'a RawRBTree<V>) -> Self {
        Iter {
            raw,
            front: raw.leftmost(),
            back: raw.rightmost(),
            remaining: raw.len(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.raw.successor(handle);
        Some(self.raw.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a V> {
        self.next_back()
    }
}

impl<'a, V> DoubleEndedIterator for Iter<'a, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.raw.predecessor(handle);
        Some(self.raw.value(handle))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over a half-open span `[first, last)` of an [`RBTree`](crate::RBTree).
///
/// This `struct` is created by [`RBTree::range`](crate::RBTree::range).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, V> {
    raw: &'a RawRBTree<V>,
    front: Option<Handle>,
    // Inclusive back end; meaningless once `done` is set.
    back: Option<Handle>,
    done: bool,
}

impl<'a, V> Range<'a, V> {
    pub(super) fn new(raw: &'a RawRBTree<V>, first: Option<Handle>, last: Option<Handle>) -> Self {
        if first == last {
            return Range {
                raw,
                front: None,
                back: None,
                done: true,
            };
        }
        let back = match last {
            None => raw.rightmost(),
            Some(handle) => raw.predecessor(handle),
        };
        Range {
            raw,
            front: first,
            back,
            done: first.is_none() || back.is_none(),
        }
    }
}

impl<'a, V> Iterator for Range<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        if self.done {
            return None;
        }
        let handle = self.front?;
        if self.front == self.back {
            self.done = true;
        } else {
            self.front = self.raw.successor(handle);
            self.done = self.front.is_none();
        }
        Some(self.raw.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (1, Some(self.raw.len()))
        }
    }

    fn last(mut self) -> Option<&'a V> {
        self.next_back()
    }
}

impl<'a, V> DoubleEndedIterator for Range<'a, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        if self.done {
            return None;
        }
        let handle = self.back?;
        if self.front == self.back {
            self.done = true;
        } else {
            self.back = self.raw.predecessor(handle);
            self.done = self.back.is_none();
        }
        Some(self.raw.value(handle))
    }
}

impl<V> FusedIterator for Range<'_, V> {}

impl<V> Clone for Range<'_, V> {
    fn clone(&self) -> Self {
        Range {
            raw: self.raw,
            front: self.front,
            back: self.back,
            done: self.done,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Range<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the elements of an [`RBTree`](crate::RBTree), in order.
///
/// This `struct` is created by the `into_iter` method on `RBTree` (provided by the
/// [`IntoIterator`] trait).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<V>,
}

impl<V> IntoIter<V> {
    pub(super) fn new(values: alloc::vec::Vec<V>) -> Self {
        IntoIter {
            inner: values.into_iter(),
        }
    }
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for IntoIter<V> {}

impl<V: fmt::Debug> fmt::Debug for IntoIter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::RBTree;
    use alloc::vec::Vec;

    fn tree_of(values: &[i32]) -> RBTree<i32> {
        let mut tree = RBTree::new();
        tree.extend_equal(values.iter().copied());
        tree
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = tree_of(&[3, 1, 4, 1, 5]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_on_empty_tree() {
        let tree = tree_of(&[]);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.range(tree.begin(), tree.end()).next(), None);
    }

    #[test]
    fn range_is_half_open() {
        let tree = tree_of(&[0, 1, 2, 3, 4, 5]);
        let first = tree.lower_bound(&2);
        let last = tree.lower_bound(&5);
        assert_eq!(tree.range(first, last).copied().collect::<Vec<_>>(), [2, 3, 4]);
        assert_eq!(tree.range(first, last).rev().copied().collect::<Vec<_>>(), [4, 3, 2]);
        assert_eq!(tree.range(first, first).count(), 0);
        assert_eq!(tree.range(first, tree.end()).copied().collect::<Vec<_>>(), [2, 3, 4, 5]);
        assert_eq!(tree.range(tree.begin(), first).last(), Some(&1));
    }

    #[test]
    fn range_meets_in_the_middle() {
        let tree = tree_of(&[0, 1, 2, 3]);
        let mut range = tree.range(tree.begin(), tree.end());
        assert_eq!(range.next(), Some(&0));
        assert_eq!(range.next_back(), Some(&3));
        assert_eq!(range.next_back(), Some(&2));
        assert_eq!(range.next(), Some(&1));
        assert_eq!(range.next(), None);
        assert_eq!(range.next_back(), None);
    }

    #[test]
    fn into_iter_yields_owned_values_both_ways() {
        let tree = tree_of(&[2, 0, 1]);
        let mut iter = tree.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next_back(), Some(2));
        assert_eq!(iter.collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn debug_lists_remaining_elements() {
        use alloc::format;

        let tree = tree_of(&[1, 2, 3]);
        let mut iter = tree.iter();
        iter.next();
        assert_eq!(format!("{iter:?}"), "[2, 3]");
    }
}

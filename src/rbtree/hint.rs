use crate::compare::{Compare, KeyOf};
use crate::raw::{Direction, Handle};

use super::{Pos, RBTree};

impl<V, X, C> RBTree<V, X, C>
where
    X: KeyOf<V>,
    C: Compare<X::Key>,
{
    /// The empty link between `before` and `hint`, which are adjacent in order. One of the two
    /// always has a free link facing the other.
    fn gap_slot(&self, before: Option<Handle>, hint: Option<Handle>) -> Option<(Option<Handle>, Direction)> {
        match (before, hint) {
            (None, None) => Some((None, Direction::Left)),
            (Some(b), _) if self.raw.node(b).right().is_none() => Some((Some(b), Direction::Right)),
            (_, Some(h)) if self.raw.node(h).left().is_none() => Some((Some(h), Direction::Left)),
            _ => None,
        }
    }

    /// The element just before `hint` (the last element when `hint` is the end position).
    fn before_hint(&self, hint: Pos) -> Option<Handle> {
        match hint.0 {
            None => self.raw.rightmost(),
            Some(h) if Some(h) == self.raw.leftmost() => None,
            Some(h) => self.raw.predecessor(h),
        }
    }

    /// Inserts `value` unless an equivalent key exists, using `hint` as a guess for the element
    /// that will follow it.
    ///
    /// Returns the position of the inserted element, or of the existing equivalent element. A
    /// correct hint skips the descent from the root; a wrong one costs two comparisons before
    /// falling back to [`insert_unique`](RBTree::insert_unique). The result never depends on the
    /// hint.
    ///
    /// # Complexity
    ///
    /// Amortized O(1) with a correct hint, O(log n) otherwise.
    pub fn insert_unique_hint(&mut self, hint: Pos, value: V) -> Pos {
        let before = self.before_hint(hint);
        let key = X::key_of(&value);
        let after_before = before.is_none_or(|b| self.compare.less(self.key(b), key));
        let before_hint = hint.0.is_none_or(|h| self.compare.less(key, self.key(h)));
        if after_before && before_hint {
            if let Some((parent, dir)) = self.gap_slot(before, hint.0) {
                return Pos(Some(self.raw.link(parent, dir, value)));
            }
        }
        self.insert_unique(value).0
    }

    /// Inserts `value` after every equivalent element, using `hint` as a guess for the element
    /// that will follow it.
    ///
    /// The hint is taken only when `value` belongs exactly there, so the resulting sequence is
    /// the one [`insert_equal`](RBTree::insert_equal) would produce.
    pub fn insert_equal_hint(&mut self, hint: Pos, value: V) -> Pos {
        let before = self.before_hint(hint);
        let key = X::key_of(&value);
        let after_before = before.is_none_or(|b| !self.compare.less(key, self.key(b)));
        let before_hint = hint.0.is_none_or(|h| self.compare.less(key, self.key(h)));
        if after_before && before_hint {
            if let Some((parent, dir)) = self.gap_slot(before, hint.0) {
                return Pos(Some(self.raw.link(parent, dir, value)));
            }
        }
        self.insert_equal(value)
    }
}

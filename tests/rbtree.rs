use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wabi_rbtree::{Descending, First, Pos, RBTree};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

type Tagged = RBTree<(i64, u32), First<i64, u32>>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Keys drawn from a narrow range so equivalent keys collide often.
fn key_strategy() -> impl Strategy<Value = i64> {
    -200i64..200i64
}

/// Deterministic LCG shuffle of `0..n`.
fn shuffled(n: i64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n).collect();
    let mut x: u64 = 0x2545_F491_4F6C_DD1D;
    for i in (1..keys.len()).rev() {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (x >> 33) as usize % (i + 1);
        keys.swap(i, j);
    }
    keys
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    InsertUnique(i64),
    InsertEqual(i64),
    EraseKey(i64),
    EraseFirst,
    EraseLast,
    LowerBound(i64),
    UpperBound(i64),
    Count(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        4 => key_strategy().prop_map(TreeOp::InsertUnique),
        4 => key_strategy().prop_map(TreeOp::InsertEqual),
        2 => key_strategy().prop_map(TreeOp::EraseKey),
        1 => Just(TreeOp::EraseFirst),
        1 => Just(TreeOp::EraseLast),
        2 => key_strategy().prop_map(TreeOp::LowerBound),
        2 => key_strategy().prop_map(TreeOp::UpperBound),
        2 => key_strategy().prop_map(TreeOp::Count),
    ]
}

// ─── Model-based checks against a sorted Vec ─────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations on an `RBTree` and on a sorted `Vec` of `(key, tag)` pairs,
    /// where the tag records insertion order. Equal runs must match the model exactly.
    #[test]
    fn tree_ops_match_sorted_vec(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree = Tagged::new();
        let mut model: Vec<(i64, u32)> = Vec::new();

        for (tag, op) in (0u32..).zip(&ops) {
            match *op {
                TreeOp::InsertUnique(k) => {
                    let (pos, inserted) = tree.insert_unique((k, tag));
                    let at = model.partition_point(|e| e.0 < k);
                    let present = model.get(at).is_some_and(|e| e.0 == k);
                    if !present {
                        model.insert(at, (k, tag));
                    }
                    prop_assert_eq!(inserted, !present, "insert_unique({})", k);
                    prop_assert_eq!(tree.get(pos), model.get(at), "insert_unique({}) position", k);
                }
                TreeOp::InsertEqual(k) => {
                    let pos = tree.insert_equal((k, tag));
                    let at = model.partition_point(|e| e.0 <= k);
                    model.insert(at, (k, tag));
                    prop_assert_eq!(tree.get(pos), Some(&(k, tag)), "insert_equal({})", k);
                }
                TreeOp::EraseKey(k) => {
                    let before = model.len();
                    model.retain(|e| e.0 != k);
                    prop_assert_eq!(tree.erase_key(&k), before - model.len(), "erase_key({})", k);
                }
                TreeOp::EraseFirst => {
                    if !model.is_empty() {
                        let expected = model.remove(0);
                        prop_assert_eq!(tree.erase(tree.begin()), expected);
                    }
                }
                TreeOp::EraseLast => {
                    if let Some(expected) = model.pop() {
                        let last = tree.prev_pos(tree.end());
                        prop_assert_eq!(tree.erase(last), expected);
                    }
                }
                TreeOp::LowerBound(k) => {
                    let at = model.partition_point(|e| e.0 < k);
                    prop_assert_eq!(tree.get(tree.lower_bound(&k)), model.get(at), "lower_bound({})", k);
                }
                TreeOp::UpperBound(k) => {
                    let at = model.partition_point(|e| e.0 <= k);
                    prop_assert_eq!(tree.get(tree.upper_bound(&k)), model.get(at), "upper_bound({})", k);
                }
                TreeOp::Count(k) => {
                    let expected = model.iter().filter(|e| e.0 == k).count();
                    prop_assert_eq!(tree.count(&k), expected, "count({})", k);
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert_eq!(tree.verify(), Ok(()));
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), model);
    }

    /// Walking positions forward and backward visits the same sequence as the iterators.
    #[test]
    fn position_walk_matches_iter(values in proptest::collection::vec(key_strategy(), 0..TEST_SIZE)) {
        let mut tree: RBTree<i64> = RBTree::new();
        tree.extend_equal(values.iter().copied());

        let mut forward = Vec::new();
        let mut pos = tree.begin();
        while pos != tree.end() {
            forward.push(tree[pos]);
            pos = tree.next_pos(pos);
        }
        prop_assert_eq!(&forward, &tree.iter().copied().collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut pos = tree.end();
        while pos != tree.begin() {
            pos = tree.prev_pos(pos);
            backward.push(tree[pos]);
        }
        backward.reverse();
        prop_assert_eq!(backward, forward);
    }

    /// Hinted inserts with arbitrary hints produce the same tree as plain inserts.
    #[test]
    fn hinted_equal_insert_matches_plain(values in proptest::collection::vec(key_strategy(), 0..TEST_SIZE)) {
        let mut plain: RBTree<i64> = RBTree::new();
        let mut hinted: RBTree<i64> = RBTree::new();
        let mut hint = Pos::END;

        for &v in &values {
            plain.insert_equal(v);
            hint = hinted.insert_equal_hint(hint, v);
            if v % 3 == 0 {
                hint = hinted.begin();
            }
        }

        prop_assert_eq!(hinted.verify(), Ok(()));
        prop_assert_eq!(hinted, plain);
    }

    /// Erasing a sub-range removes exactly those elements and keeps the rest valid.
    #[test]
    fn erase_range_matches_vec_drain(
        values in proptest::collection::vec(key_strategy(), 0..TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let mut tree: RBTree<i64> = RBTree::new();
        tree.extend_equal(values.iter().copied());
        let mut model = values.clone();
        model.sort_unstable();

        let erased = tree.erase_range(tree.lower_bound(&lo), tree.upper_bound(&hi));
        let before = model.len();
        model.retain(|&v| v < lo || v > hi);

        prop_assert_eq!(erased, before - model.len());
        prop_assert_eq!(tree.verify(), Ok(()));
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), model);
    }
}

// ─── Deterministic scenarios ─────────────────────────────────────────────────

#[test]
fn shuffled_erase_keeps_tree_valid() {
    init_logging();
    let mut tree: RBTree<i64> = RBTree::new();
    for key in shuffled(100) {
        assert!(tree.insert_unique(key).1);
        assert_eq!(tree.verify(), Ok(()));
    }
    assert_eq!(tree.len(), 100);

    let mut remaining = 100;
    for key in shuffled(100).into_iter().rev() {
        assert_eq!(tree.erase_key(&key), 1);
        remaining -= 1;
        assert_eq!(tree.verify(), Ok(()));
        assert_eq!(tree.len(), remaining);
        assert_eq!(tree.iter().count(), remaining);
        assert!(!tree.contains(&key));
    }
    assert!(tree.is_empty());
    assert!(tree.begin().is_end());
}

#[test]
fn ascending_and_descending_inserts_stay_balanced() {
    init_logging();
    for keys in [(0..1_000).collect::<Vec<i64>>(), (0..1_000).rev().collect()] {
        let mut tree: RBTree<i64> = RBTree::new();
        for &key in &keys {
            tree.insert_unique(key);
        }
        assert_eq!(tree.verify(), Ok(()));
        assert_eq!(tree.first(), Some(&0));
        assert_eq!(tree.last(), Some(&999));
    }
}

#[test]
fn positions_survive_unrelated_erases() {
    init_logging();
    let mut tree: RBTree<i64> = RBTree::new();
    let positions: Vec<(i64, Pos)> = shuffled(64).into_iter().map(|k| (k, tree.insert_equal(k))).collect();

    for &(key, pos) in &positions {
        if key % 2 == 1 {
            assert_eq!(tree.erase(pos), key);
        }
    }
    for &(key, pos) in &positions {
        if key % 2 == 0 {
            assert_eq!(tree[pos], key);
        }
    }
    assert_eq!(tree.verify(), Ok(()));
}

#[test]
fn insert_then_erase_every_element_by_position() {
    init_logging();
    let mut tree: RBTree<i64> = RBTree::new();
    tree.extend_equal(shuffled(50).into_iter().map(|k| k % 10));
    while !tree.is_empty() {
        let middle = tree.lower_bound(&5);
        let pos = if middle.is_end() { tree.begin() } else { middle };
        tree.erase(pos);
        assert_eq!(tree.verify(), Ok(()));
    }
    assert_eq!(tree.len(), 0);
}

#[test]
fn descending_comparator_reverses_order() {
    let mut tree: RBTree<i64, wabi_rbtree::Identity, Descending> = RBTree::new();
    tree.extend_unique([3, 9, 1, 7]);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [9, 7, 3, 1]);
    assert_eq!(tree.get(tree.lower_bound(&5)), Some(&3));
    assert!(tree.key_range(8..=2).copied().eq([7, 3]));
    assert_eq!(tree.verify(), Ok(()));
}

#[test]
fn clone_and_clear_are_independent() {
    init_logging();
    let mut tree: RBTree<i64> = RBTree::new();
    tree.extend_unique(shuffled(200));
    let copy = tree.clone();
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(copy.len(), 200);
    assert_eq!(copy.verify(), Ok(()));

    tree.extend_unique([1, 2, 3]);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    assert!(copy.iter().copied().eq(0..200));
}

#[test]
#[should_panic(expected = "range start is greater than range end in RBTree")]
fn inverted_key_range_panics() {
    let tree: RBTree<i64> = RBTree::new();
    #[allow(clippy::reversed_empty_ranges)]
    let _ = tree.key_range(5..1);
}

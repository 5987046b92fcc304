use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::{BTreeMap, BTreeSet};
use std::hint::black_box;
use wabi_rbtree::{RBMap, RBMultiSet, RBSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn patterns() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("set_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("RBSet", N), |b| {
            b.iter(|| {
                let mut set = RBSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });

        group.finish();
    }
}

fn bench_set_contains(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("set_contains_{pattern}"));

        let rb_set: RBSet<i64> = keys.iter().copied().collect();
        group.bench_function(BenchmarkId::new("RBSet", N), |b| {
            b.iter(|| {
                for k in &keys {
                    black_box(rb_set.contains(k));
                }
            });
        });

        let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                for k in &keys {
                    black_box(bt_set.contains(k));
                }
            });
        });

        group.finish();
    }
}

fn bench_set_remove(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("set_remove_{pattern}"));

        group.bench_function(BenchmarkId::new("RBSet", N), |b| {
            b.iter_batched(
                || keys.iter().copied().collect::<RBSet<i64>>(),
                |mut set| {
                    for k in &keys {
                        set.remove(k);
                    }
                    set
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter_batched(
                || keys.iter().copied().collect::<BTreeSet<i64>>(),
                |mut set| {
                    for k in &keys {
                        set.remove(k);
                    }
                    set
                },
                BatchSize::LargeInput,
            );
        });

        group.finish();
    }
}

fn bench_multiset_insert(c: &mut Criterion) {
    // Folding keys into a small domain forces long runs of equivalent elements.
    let keys: Vec<i64> = random_keys(N).into_iter().map(|k| k % 64).collect();
    let mut group = c.benchmark_group("multiset_insert_repeats");

    group.bench_function(BenchmarkId::new("RBMultiSet", N), |b| {
        b.iter(|| {
            let mut bag = RBMultiSet::new();
            for &k in &keys {
                bag.insert(k);
            }
            bag
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap<_, usize>", N), |b| {
        b.iter(|| {
            let mut bag = BTreeMap::new();
            for &k in &keys {
                *bag.entry(k).or_insert(0usize) += 1;
            }
            bag
        });
    });

    group.finish();
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("map_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("RBMap", N), |b| {
            b.iter(|| {
                let mut map = RBMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.finish();
    }
}

fn bench_map_get(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("map_get_{pattern}"));

        let rb_map: RBMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        group.bench_function(BenchmarkId::new("RBMap", N), |b| {
            b.iter(|| {
                for k in &keys {
                    black_box(rb_map.get(k));
                }
            });
        });

        let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                for k in &keys {
                    black_box(bt_map.get(k));
                }
            });
        });

        group.finish();
    }
}

fn bench_map_remove(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("map_remove_{pattern}"));

        group.bench_function(BenchmarkId::new("RBMap", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<RBMap<i64, i64>>(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::LargeInput,
            );
        });

        group.finish();
    }
}

// ─── Whole-tree operations ──────────────────────────────────────────────────

fn bench_clone_and_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_set: RBSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("set_clone");
    group.bench_function(BenchmarkId::new("RBSet", N), |b| b.iter(|| rb_set.clone()));
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| b.iter(|| bt_set.clone()));
    group.finish();

    let mut group = c.benchmark_group("set_iter");
    group.bench_function(BenchmarkId::new("RBSet", N), |b| b.iter(|| rb_set.iter().sum::<i64>()));
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| b.iter(|| bt_set.iter().sum::<i64>()));
    group.finish();
}

criterion_group!(set_benches, bench_set_insert, bench_set_contains, bench_set_remove, bench_multiset_insert,);

criterion_group!(map_benches, bench_map_insert, bench_map_get, bench_map_remove,);

criterion_group!(tree_benches, bench_clone_and_iter,);

criterion_main!(set_benches, map_benches, tree_benches);

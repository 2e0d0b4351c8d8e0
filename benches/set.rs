use criterion::{Criterion, black_box, criterion_group, criterion_main};
use prim_collections::{FloatBitsStrategy, OpenHashBigSet, OpenHashSet, RBTreeSet};
use std::collections::{BTreeSet, HashSet};

fn bench_hash_set(c: &mut Criterion) {
    let n = 10_000;
    {
        let mut group = c.benchmark_group("HashSet vs OpenHashSet (Insert 10k)");
        group.bench_function("std::collections::HashSet", |b| {
            b.iter(|| {
                let mut s = HashSet::new();
                for i in 0..n {
                    s.insert(black_box(i as u64));
                }
                s
            })
        });

        group.bench_function("OpenHashSet<u64>", |b| {
            b.iter(|| {
                let mut s: OpenHashSet<u64> = OpenHashSet::new();
                for i in 0..n {
                    s.insert(black_box(i as u64));
                }
                s
            })
        });

        group.bench_function("OpenHashBigSet<u64>", |b| {
            b.iter(|| {
                let mut s: OpenHashBigSet<u64> = OpenHashBigSet::new();
                for i in 0..n {
                    s.insert(black_box(i as u64));
                }
                s
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("HashSet vs OpenHashSet (Contains f64)");
        let values: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        let s_open: OpenHashSet<f64, FloatBitsStrategy> = values.iter().copied().collect();
        let s_bits: HashSet<u64> = values.iter().map(|v| v.to_bits()).collect();

        group.bench_function("std::collections::HashSet<u64 bits>", |b| {
            b.iter(|| {
                for v in &values {
                    black_box(s_bits.contains(&black_box(v.to_bits())));
                }
            })
        });

        group.bench_function("OpenHashSet<f64, FloatBitsStrategy>", |b| {
            b.iter(|| {
                for v in &values {
                    black_box(s_open.contains(black_box(v)));
                }
            })
        });
        group.finish();
    }
}

fn bench_tree_set(c: &mut Criterion) {
    let n = 10_000;
    let mut group = c.benchmark_group("BTreeSet vs RBTreeSet (Insert 10k)");
    group.bench_function("std::collections::BTreeSet", |b| {
        b.iter(|| {
            let mut s = BTreeSet::new();
            for i in 0..n {
                s.insert(black_box((i * 7919 % n) as i32));
            }
            s
        })
    });

    group.bench_function("RBTreeSet<i32>", |b| {
        b.iter(|| {
            let mut s = RBTreeSet::new();
            for i in 0..n {
                s.insert(black_box((i * 7919 % n) as i32));
            }
            s
        })
    });
    group.finish();
}

criterion_group!(benches, bench_hash_set, bench_tree_set);
criterion_main!(benches);

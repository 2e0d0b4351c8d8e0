use criterion::{Criterion, black_box, criterion_group, criterion_main};
use prim_collections::{ArrayMap, LinkedOpenHashMap, OpenHashMap, RBTreeMap};
use std::collections::{BTreeMap, HashMap};

fn bench_hash_map(c: &mut Criterion) {
    let n = 10_000;
    {
        let mut group = c.benchmark_group("HashMap vs OpenHashMap (Insert 10k)");
        group.bench_function("std::collections::HashMap", |b| {
            b.iter(|| {
                let mut m = HashMap::new();
                for i in 0..n {
                    m.insert(black_box(i as i32), black_box(i as i64));
                }
                m
            })
        });

        group.bench_function("hashbrown::HashMap", |b| {
            b.iter(|| {
                let mut m = hashbrown::HashMap::new();
                for i in 0..n {
                    m.insert(black_box(i as i32), black_box(i as i64));
                }
                m
            })
        });

        group.bench_function("OpenHashMap<i32, i64>", |b| {
            b.iter(|| {
                let mut m: OpenHashMap<i32, i64> = OpenHashMap::new();
                for i in 0..n {
                    m.insert(black_box(i as i32), black_box(i as i64));
                }
                m
            })
        });

        group.bench_function("LinkedOpenHashMap<i32, i64>", |b| {
            b.iter(|| {
                let mut m: LinkedOpenHashMap<i32, i64> = LinkedOpenHashMap::new();
                for i in 0..n {
                    m.insert(black_box(i as i32), black_box(i as i64));
                }
                m
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("HashMap vs OpenHashMap (Get 10k)");
        let mut m_std = HashMap::new();
        let mut m_open: OpenHashMap<i32, i64> = OpenHashMap::new();
        for i in 0..n {
            m_std.insert(i as i32, i as i64);
            m_open.insert(i as i32, i as i64);
        }

        group.bench_function("std::collections::HashMap", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(m_std.get(&black_box(i as i32)));
                }
            })
        });

        group.bench_function("OpenHashMap<i32, i64>", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(m_open.get(&black_box(i as i32)));
                }
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("HashMap vs OpenHashMap (Insert/Remove churn)");
        group.bench_function("std::collections::HashMap", |b| {
            b.iter(|| {
                let mut m = HashMap::new();
                for i in 0..n {
                    m.insert(black_box(i as i32), i as i64);
                    if i % 3 == 0 {
                        m.remove(&black_box((i / 2) as i32));
                    }
                }
                m
            })
        });

        group.bench_function("OpenHashMap<i32, i64>", |b| {
            b.iter(|| {
                let mut m: OpenHashMap<i32, i64> = OpenHashMap::new();
                for i in 0..n {
                    m.insert(black_box(i as i32), i as i64);
                    if i % 3 == 0 {
                        m.remove(&black_box((i / 2) as i32));
                    }
                }
                m
            })
        });
        group.finish();
    }
}

fn bench_small_map(c: &mut Criterion) {
    let n = 8;
    let mut group = c.benchmark_group("HashMap vs ArrayMap (Insert 8)");
    group.bench_function("std::collections::HashMap", |b| {
        b.iter(|| {
            let mut m = HashMap::with_capacity(n);
            for i in 0..n {
                m.insert(black_box(i as i32), black_box(i as i32));
            }
            m
        })
    });

    group.bench_function("ArrayMap<i32, i32>", |b| {
        b.iter(|| {
            let mut m: ArrayMap<i32, i32> = ArrayMap::with_capacity(n);
            for i in 0..n {
                m.insert(black_box(i as i32), black_box(i as i32));
            }
            m
        })
    });
    group.finish();
}

fn bench_tree_map(c: &mut Criterion) {
    let n = 10_000;
    {
        let mut group = c.benchmark_group("BTreeMap vs RBTreeMap (Insert 10k)");
        group.bench_function("std::collections::BTreeMap", |b| {
            b.iter(|| {
                let mut m = BTreeMap::new();
                for i in 0..n {
                    m.insert(black_box((i * 7919 % n) as i32), black_box(i as i32));
                }
                m
            })
        });

        group.bench_function("RBTreeMap<i32, i32>", |b| {
            b.iter(|| {
                let mut m = RBTreeMap::new();
                for i in 0..n {
                    m.insert(black_box((i * 7919 % n) as i32), black_box(i as i32));
                }
                m
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("BTreeMap vs RBTreeMap (Get 10k)");
        let mut m_std = BTreeMap::new();
        let mut m_rb = RBTreeMap::new();
        for i in 0..n {
            m_std.insert(i as i32, i as i32);
            m_rb.insert(i as i32, i as i32);
        }

        group.bench_function("std::collections::BTreeMap", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(m_std.get(&black_box(i as i32)));
                }
            })
        });

        group.bench_function("RBTreeMap<i32, i32>", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(m_rb.get(&black_box(i as i32)));
                }
            })
        });
        group.finish();
    }
}

criterion_group!(benches, bench_hash_map, bench_small_map, bench_tree_map);
criterion_main!(benches);

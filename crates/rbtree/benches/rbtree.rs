use std::collections::BTreeMap;
use std::hint::black_box;

use bench::{RuntimeConfig, ascending_keys, default_rng, distinct_keys};
use criterion::measurement::Measurement;
use criterion::{BatchSize, BenchmarkGroup, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::seq::SliceRandom;

use rbtree::RbTree;

const SIZES: [usize; 4] = [1_024, 4_096, 16_384, 65_536];
const OPS_PER_ITER: usize = 200;

/// The slice of the map API the workloads need.
trait Map: Default {
    fn put(&mut self, key: i64, value: u64);
    fn find(&self, key: i64) -> Option<u64>;
    fn take(&mut self, key: i64) -> Option<u64>;
}

impl Map for RbTree<u64> {
    fn put(&mut self, key: i64, value: u64) {
        let _ = self.insert(key, value);
    }

    fn find(&self, key: i64) -> Option<u64> {
        self.get(key).ok().copied()
    }

    fn take(&mut self, key: i64) -> Option<u64> {
        self.delete(key).ok()
    }
}

impl Map for BTreeMap<i64, u64> {
    fn put(&mut self, key: i64, value: u64) {
        self.entry(key).or_insert(value);
    }

    fn find(&self, key: i64) -> Option<u64> {
        self.get(&key).copied()
    }

    fn take(&mut self, key: i64) -> Option<u64> {
        self.remove(&key)
    }
}

fn build<M: Map>(keys: &[i64]) -> M {
    let mut map = M::default();
    for (i, &k) in keys.iter().enumerate() {
        map.put(k, i as u64);
    }
    map
}

fn bench_insert<M: Map, T: Measurement>(group: &mut BenchmarkGroup<'_, T>, label: &str) {
    let mut rng = default_rng();
    for &size in &SIZES {
        RuntimeConfig::for_size(size).apply(group);
        let random = distinct_keys(&mut rng, size);
        let ascending = ascending_keys(size);

        group.bench_function(BenchmarkId::new(format!("{label}/random"), size), |bencher| {
            bencher.iter(|| black_box(build::<M>(&random)))
        });
        group.bench_function(BenchmarkId::new(format!("{label}/ascending"), size), |bencher| {
            bencher.iter(|| black_box(build::<M>(&ascending)))
        });
    }
}

fn bench_get<M: Map, T: Measurement>(group: &mut BenchmarkGroup<'_, T>, label: &str) {
    let mut rng = default_rng();
    for &size in &SIZES {
        RuntimeConfig::for_size(size).apply(group);
        let keys = distinct_keys(&mut rng, size);
        let map = build::<M>(&keys);
        let lookups: Vec<i64> = (0..OPS_PER_ITER)
            .map(|_| {
                if rng.random_range(0..100) < 80 {
                    keys[rng.random_range(0..keys.len())]
                } else {
                    rng.random()
                }
            })
            .collect();

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                for &k in &lookups {
                    black_box(map.find(k));
                }
            })
        });
    }
}

fn bench_delete<M: Map, T: Measurement>(group: &mut BenchmarkGroup<'_, T>, label: &str) {
    let mut rng = default_rng();
    for &size in &SIZES {
        RuntimeConfig::for_size(size).apply(group);
        let keys = distinct_keys(&mut rng, size);
        let mut order = keys.clone();
        order.shuffle(&mut rng);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_batched(
                || build::<M>(&keys),
                |mut map| {
                    for &k in &order {
                        black_box(map.take(k));
                    }
                    map
                },
                BatchSize::LargeInput,
            )
        });
    }
}

fn bench_mixed<M: Map, T: Measurement>(group: &mut BenchmarkGroup<'_, T>, label: &str) {
    let mut rng = default_rng();
    for &size in &SIZES {
        RuntimeConfig::for_size(size).apply(group);
        let keys = distinct_keys(&mut rng, size);
        let mut map = build::<M>(&keys);
        let fresh = distinct_keys(&mut rng, OPS_PER_ITER);

        // 80% reads, 10% inserts, 10% removes of the keys just inserted.
        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                for (i, &k) in fresh.iter().enumerate() {
                    match i % 10 {
                        0 => map.put(k, i as u64),
                        1 => {
                            black_box(map.take(fresh[i - 1]));
                        }
                        _ => {
                            black_box(map.find(keys[(i * 7919) % keys.len()]));
                        }
                    }
                }
            })
        });
    }
}

fn bench(c: &mut Criterion) {
    let mut insert = c.benchmark_group("rbtree/insert");
    bench_insert::<RbTree<u64>, _>(&mut insert, "rbtree");
    bench_insert::<BTreeMap<i64, u64>, _>(&mut insert, "std_btree");
    insert.finish();

    let mut get = c.benchmark_group("rbtree/get");
    bench_get::<RbTree<u64>, _>(&mut get, "rbtree");
    bench_get::<BTreeMap<i64, u64>, _>(&mut get, "std_btree");
    get.finish();

    let mut delete = c.benchmark_group("rbtree/delete");
    bench_delete::<RbTree<u64>, _>(&mut delete, "rbtree");
    bench_delete::<BTreeMap<i64, u64>, _>(&mut delete, "std_btree");
    delete.finish();

    let mut mixed = c.benchmark_group("rbtree/mixed");
    bench_mixed::<RbTree<u64>, _>(&mut mixed, "rbtree");
    bench_mixed::<BTreeMap<i64, u64>, _>(&mut mixed, "std_btree");
    mixed.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);

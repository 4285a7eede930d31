use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_medium_runtime_config, apply_small_runtime_config, default_rng, shuffled_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;
use rand::rngs::StdRng;

use ordered_map::{Avl, Balance, RedBlack, TreeMap};

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const GET_HIT_RATE_PERCENT: u32 = 80;

/// The slice of map behavior the workloads exercise, so `BTreeMap` can run
/// as a baseline next to the tree maps.
trait BenchMap: FromIterator<(u64, u64)> {
    fn get(&self, key: u64) -> Option<u64>;
    fn floor(&self, key: u64) -> Option<u64>;
    fn update(&mut self, key: u64, value: u64) -> Option<u64>;
    fn remove(&mut self, key: u64) -> Option<u64>;
    fn len(&self) -> usize;
}

impl<B: Balance> BenchMap for TreeMap<u64, u64, B> {
    fn get(&self, key: u64) -> Option<u64> {
        TreeMap::get(self, &key).copied()
    }

    fn floor(&self, key: u64) -> Option<u64> {
        self.floor_key(&key).copied()
    }

    fn update(&mut self, key: u64, value: u64) -> Option<u64> {
        TreeMap::update(self, key, value)
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        TreeMap::remove(self, &key).map(|entry| entry.into_value())
    }

    fn len(&self) -> usize {
        TreeMap::len(self)
    }
}

impl BenchMap for BTreeMap<u64, u64> {
    fn get(&self, key: u64) -> Option<u64> {
        BTreeMap::get(self, &key).copied()
    }

    fn floor(&self, key: u64) -> Option<u64> {
        self.range(..=key).next_back().map(|(&k, _)| k)
    }

    fn update(&mut self, key: u64, value: u64) -> Option<u64> {
        self.insert(key, value)
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        BTreeMap::remove(self, &key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

#[derive(Clone, Copy)]
enum ReadOp {
    Get { key: u64 },
    Floor { key: u64 },
}

/// Keys are spread over `0..4 * size` so that misses land between stored keys.
fn initial_pairs(size: usize) -> Vec<(u64, u64)> {
    shuffled_keys(&mut default_rng(), size)
        .into_iter()
        .map(|k| (k * 4, k))
        .collect()
}

fn generate_read_ops(pairs: &[(u64, u64)], rng: &mut StdRng) -> Vec<ReadOp> {
    let domain = 4 * pairs.len() as u64;
    (0..OPS_PER_ITER)
        .map(|_| {
            if rng.random_bool(0.5) {
                let key = if rng.random_range(0..100) < GET_HIT_RATE_PERCENT {
                    pairs[rng.random_range(0..pairs.len())].0
                } else {
                    rng.random_range(0..domain)
                };
                ReadOp::Get { key }
            } else {
                ReadOp::Floor {
                    key: rng.random_range(0..domain),
                }
            }
        })
        .collect()
}

fn bench_read<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    M: BenchMap,
    T: Measurement<Value = Duration>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let pairs = initial_pairs(size);
        let map: M = pairs.iter().copied().collect();
        let mut rng = default_rng();

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let ops = generate_read_ops(&pairs, &mut rng);
                    let start = Instant::now();
                    for op in ops {
                        match op {
                            ReadOp::Get { key } => black_box(map.get(key)),
                            ReadOp::Floor { key } => black_box(map.floor(key)),
                        };
                    }
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

/// Inserts `OPS_PER_ITER / 2` odd keys (never present initially) and removes
/// them again, so every iteration starts from the same map.
fn bench_update<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    M: BenchMap,
    T: Measurement<Value = Duration>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let mut map: M = initial_pairs(size).into_iter().collect();
        let domain = 4 * size as u64;
        let mut rng = default_rng();

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let fresh: Vec<u64> = (0..OPS_PER_ITER / 2)
                        .map(|_| rng.random_range(0..domain) | 1)
                        .collect();
                    let start = Instant::now();
                    for &key in &fresh {
                        black_box(map.update(key, key));
                    }
                    for &key in &fresh {
                        black_box(map.remove(key));
                    }
                    total += start.elapsed();
                    debug_assert_eq!(map.len(), size);
                }
                total
            })
        });
    }
}

fn bench_build<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    M: BenchMap,
    T: Measurement<Value = Duration>,
{
    for &size in &SIZES {
        apply_medium_runtime_config(group);
        let pairs = initial_pairs(size);
        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| black_box(pairs.iter().copied().collect::<M>().len()))
        });
    }
}

pub fn bench_all_read<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_read::<BTreeMap<u64, u64>, _>(group, "std_btree");
    bench_read::<TreeMap<u64, u64, Avl>, _>(group, "avl");
    bench_read::<TreeMap<u64, u64, RedBlack>, _>(group, "rb");
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_update::<BTreeMap<u64, u64>, _>(group, "std_btree");
    bench_update::<TreeMap<u64, u64, Avl>, _>(group, "avl");
    bench_update::<TreeMap<u64, u64, RedBlack>, _>(group, "rb");
}

pub fn bench_all_build<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_build::<BTreeMap<u64, u64>, _>(group, "std_btree");
    bench_build::<TreeMap<u64, u64, Avl>, _>(group, "avl");
    bench_build::<TreeMap<u64, u64, RedBlack>, _>(group, "rb");
}

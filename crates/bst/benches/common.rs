use std::hint::black_box;

use bench::{apply_small_runtime_config, default_rng, shuffled_keys};
use criterion::measurement::Measurement;
use criterion::{BatchSize, BenchmarkGroup, BenchmarkId};
use rand::Rng;

use bst::{Balance, SearchTree};

const SIZES: [usize; 4] = [1_000, 8_000, 64_000, 256_000];
const QUERIES_PER_ITER: usize = 200;

pub fn bench_insert<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    B: Balance,
    T: Measurement,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let keys = shuffled_keys(&mut default_rng(), size);
        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                let mut tree: SearchTree<u64, B> = SearchTree::new();
                for &key in &keys {
                    black_box(tree.insert(key));
                }
                tree.len()
            })
        });
    }
}

pub fn bench_remove<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    B: Balance,
    B::Meta: Clone,
    T: Measurement,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let keys = shuffled_keys(&mut default_rng(), size);
        let full: SearchTree<u64, B> = SearchTree::from_sorted(0..size as u64);
        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_batched(
                || full.clone(),
                |mut tree| {
                    for key in &keys {
                        black_box(tree.remove(key));
                    }
                    tree
                },
                BatchSize::LargeInput,
            )
        });
    }
}

pub fn bench_query<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    B: Balance,
    T: Measurement,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        // Even keys only, so half of the probes miss.
        let tree: SearchTree<u64, B> = (0..size as u64).map(|k| k * 2).collect();
        let mut rng = default_rng();
        let probes: Vec<u64> = (0..QUERIES_PER_ITER)
            .map(|_| rng.random_range(0..2 * size as u64))
            .collect();
        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                for probe in &probes {
                    black_box(tree.get(probe));
                    black_box(tree.floor(probe));
                    black_box(tree.lower(probe));
                }
            })
        });
    }
}

use std::ops::Range;
use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// `0..len` in random order, each key exactly once.
pub fn shuffled_keys<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..len as u64).collect();
    keys.shuffle(rng);
    keys
}

/// Non-empty half-open ranges inside `0..domain`, at most `max_width` wide.
pub fn random_ranges<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    domain: u64,
    max_width: u64,
) -> Vec<Range<u64>> {
    debug_assert!(domain > 1 && max_width > 0);
    (0..count)
        .map(|_| {
            let start = rng.random_range(0..domain - 1);
            let width = rng.random_range(1..=max_width);
            start..(start + width).min(domain)
        })
        .collect()
}

use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const RNG_SEED: u64 = 0x5EED_2026;

/// Criterion timing preset for one benchmark size.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    pub sample_size: usize,
    pub warm_up: Duration,
    pub measurement: Duration,
}

impl RuntimeConfig {
    pub const SMALL: Self = Self::new(15, 100, 200);
    pub const MEDIUM: Self = Self::new(15, 500, 1000);
    pub const LARGE: Self = Self::new(10, 800, 1500);

    const fn new(sample_size: usize, warm_up_ms: u64, measurement_ms: u64) -> Self {
        Self {
            sample_size,
            warm_up: Duration::from_millis(warm_up_ms),
            measurement: Duration::from_millis(measurement_ms),
        }
    }

    /// Picks a preset by the number of elements a benchmark works on.
    pub fn for_size(size: usize) -> Self {
        if size <= 1_024 {
            Self::SMALL
        } else if size <= 16_384 {
            Self::MEDIUM
        } else {
            Self::LARGE
        }
    }

    pub fn apply<M: Measurement>(self, group: &mut BenchmarkGroup<'_, M>) {
        group.sample_size(self.sample_size);
        group.warm_up_time(self.warm_up);
        group.measurement_time(self.measurement);
    }
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// `n` distinct keys spread over the whole `i64` range, in random order.
pub fn distinct_keys<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<i64> {
    let stride = (u64::MAX / (n as u64).max(1)).max(1);
    let mut keys: Vec<i64> = (0..n as u64)
        .map(|i| i64::MIN.wrapping_add((i * stride + rng.random_range(0..stride)) as i64))
        .collect();
    keys.shuffle(rng);
    keys
}

/// `0..n` in ascending order, the worst case for an unbalanced tree.
pub fn ascending_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

//! Shared inputs for the framewise benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Signal lengths, in hops, exercised by every benchmark.
pub const HOPS: [usize; 3] = [64, 256, 1024];

/// Uniform noise in `[-1, 1)` from a fixed seed.
pub fn noise(len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

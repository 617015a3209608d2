use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrency-safe source of independent generator instances.
///
/// Each concurrent fill task draws its own generator; instances are never
/// shared across tasks.
pub trait RandomFactory: Send + Sync {
    fn new_rng(&self) -> StdRng;
}

/// Derives one generator per call from a base seed and an atomic counter,
/// giving reproducible but pairwise-independent streams
#[derive(Debug)]
pub struct SeedSequenceFactory {
    base_seed: u64,
    counter: AtomicU64,
}

impl SeedSequenceFactory {
    pub fn new(base_seed: u64) -> Self {
        Self {
            base_seed,
            counter: AtomicU64::new(0),
        }
    }
}

impl RandomFactory for SeedSequenceFactory {
    fn new_rng(&self) -> StdRng {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        StdRng::seed_from_u64(self.base_seed.wrapping_add(n).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// OS-entropy generators, one per call
#[derive(Debug, Default, Clone, Copy)]
pub struct EntropyFactory;

impl RandomFactory for EntropyFactory {
    fn new_rng(&self) -> StdRng {
        StdRng::from_entropy()
    }
}

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SamplerConfig;

/// Uniform random draws, shareable across tasks.
pub trait RandomSource: Send + Sync {
    /// A uniformly distributed index in `0..upper`. Returns 0 when `upper` is 0 or 1.
    fn below(&self, upper: usize) -> usize;
}

/// `StdRng` behind a mutex.
pub struct ThreadSafeRandom {
    rng: Mutex<StdRng>,
}

impl ThreadSafeRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for ThreadSafeRandom {
    fn below(&self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        // A panic while drawing cannot leave the generator in a bad state.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..upper)
    }
}

/// A shared random source handed out through counted leases.
#[derive(Clone)]
pub struct RandomCapability {
    source: Arc<dyn RandomSource>,
    leases: Arc<AtomicUsize>,
}

impl fmt::Debug for RandomCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomCapability")
            .field("active_leases", &self.active_leases())
            .finish()
    }
}

impl RandomCapability {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            leases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Seeded when the config carries a seed, from entropy otherwise.
    pub fn from_config(config: &SamplerConfig) -> Self {
        match config.seed {
            Some(seed) => Self::new(ThreadSafeRandom::seeded(seed)),
            None => Self::new(ThreadSafeRandom::from_entropy()),
        }
    }

    pub fn acquire(&self) -> RandomLease {
        self.leases.fetch_add(1, Ordering::SeqCst);
        RandomLease {
            source: Arc::clone(&self.source),
            leases: Arc::clone(&self.leases),
        }
    }

    /// Leases acquired and not yet released.
    pub fn active_leases(&self) -> usize {
        self.leases.load(Ordering::SeqCst)
    }
}

/// Scoped access to a [`RandomCapability`]. Released exactly once, when dropped.
pub struct RandomLease {
    source: Arc<dyn RandomSource>,
    leases: Arc<AtomicUsize>,
}

impl RandomLease {
    pub fn source(&self) -> &dyn RandomSource {
        self.source.as_ref()
    }

    pub fn release(self) {
        drop(self)
    }
}

impl Drop for RandomLease {
    fn drop(&mut self) {
        self.leases.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let a = ThreadSafeRandom::seeded(42);
        let b = ThreadSafeRandom::seeded(42);
        let xs: Vec<usize> = (0..16).map(|_| a.below(1000)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.below(1000)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| *x < 1000));
    }

    #[test]
    fn below_one_is_zero() {
        assert_eq!(ThreadSafeRandom::from_entropy().below(1), 0);
    }

    #[test]
    fn below_zero_is_zero() {
        assert_eq!(ThreadSafeRandom::seeded(8).below(0), 0);
    }

    #[test]
    fn leases_are_counted() {
        let capability = RandomCapability::new(ThreadSafeRandom::seeded(1));
        let first = capability.acquire();
        let second = capability.acquire();
        assert_eq!(capability.active_leases(), 2);

        first.release();
        assert_eq!(capability.active_leases(), 1);
        drop(second);
        assert_eq!(capability.active_leases(), 0);
    }
}

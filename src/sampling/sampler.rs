use futures::{pin_mut, Stream, StreamExt};

use super::random::{RandomCapability, RandomLease, RandomSource};
use crate::config::{OversamplePolicy, SamplerConfig};
use crate::sets;
use crate::stream::{self, AccessStream};
use crate::{AccessError, Cancellation};

enum Draw {
    Distinct(usize),
    WithReplacement(usize),
}

/// Uniform sampling from caller-supplied populations.
///
/// Holds a lease on a [`RandomCapability`] for its whole life. The lease is released
/// when the sampler is closed or dropped, including when it is dropped inside an
/// aborted task.
pub struct Sampler {
    lease: RandomLease,
    config: SamplerConfig,
}

impl Sampler {
    pub fn new(capability: &RandomCapability, config: SamplerConfig) -> Self {
        Self {
            lease: capability.acquire(),
            config,
        }
    }

    /// A sampler with its own capability, seeded from `config.seed` when present.
    pub fn from_config(config: SamplerConfig) -> Self {
        Self::new(&RandomCapability::from_config(&config), config)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Release the random capability.
    pub fn close(self) {
        self.lease.release();
    }

    fn random(&self) -> &dyn RandomSource {
        self.lease.source()
    }

    fn plan(&self, count: usize, available: usize) -> Result<Draw, AccessError> {
        if self.config.with_replacement {
            return replacement(count, available);
        }
        if count <= available {
            return Ok(Draw::Distinct(count));
        }
        match self.config.oversample {
            OversamplePolicy::Error => Err(AccessError::SampleExceedsPopulation {
                requested: count,
                available,
            }),
            OversamplePolicy::Clamp => Ok(Draw::Distinct(available)),
            OversamplePolicy::WithReplacement => replacement(count, available),
        }
    }

    pub fn sample_one<T: Clone>(&self, source: &[T]) -> Result<T, AccessError> {
        if source.is_empty() {
            return Err(AccessError::EmptyPopulation);
        }
        Ok(source[self.random().below(source.len())].clone())
    }

    /// `count` elements, distinct positions unless configured for replacement.
    pub fn sample_many<T: Clone>(&self, count: usize, source: &[T]) -> Result<Vec<T>, AccessError> {
        let random = self.random();
        let picked: Vec<T> = match self.plan(count, source.len())? {
            Draw::Distinct(k) => {
                // Partial Fisher-Yates over positions.
                let mut positions: Vec<usize> = (0..source.len()).collect();
                for i in 0..k {
                    let j = i + random.below(source.len() - i);
                    positions.swap(i, j);
                }
                positions[..k].iter().map(|&i| source[i].clone()).collect()
            }
            Draw::WithReplacement(k) => (0..k)
                .map(|_| source[random.below(source.len())].clone())
                .collect(),
        };
        tracing::debug!(requested = count, returned = picked.len(), "sample_many");
        Ok(picked)
    }

    /// Lazily draw `count` elements from `source`, one draw per pull.
    pub fn sample_stream<'a, T>(
        &'a self,
        count: usize,
        source: Vec<T>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'a, T>, AccessError>
    where
        T: Clone + Send + 'a,
    {
        let random = self.random();
        let draws: Vec<usize> = match self.plan(count, source.len())? {
            Draw::Distinct(k) => (0..k).collect(),
            Draw::WithReplacement(k) => {
                return Ok(stream::per_item(cancel, (0..k).collect(), move |_| {
                    Ok(source[random.below(source.len())].clone())
                }));
            }
        };
        let mut pool = source;
        Ok(stream::per_item(cancel, draws, move |_| {
            let j = random.below(pool.len());
            Ok(pool.swap_remove(j))
        }))
    }

    /// Sample from an async source of unknown length with reservoir sampling.
    ///
    /// The source is consumed completely. An error item aborts the call.
    pub async fn sample_from_stream<T, S>(
        &self,
        count: usize,
        source: S,
        cancel: &Cancellation,
    ) -> Result<Vec<T>, AccessError>
    where
        T: Clone,
        S: Stream<Item = Result<T, AccessError>>,
    {
        pin_mut!(source);
        let random = self.random();
        let keep_all = self.config.with_replacement;
        let mut reservoir: Vec<T> = Vec::new();
        let mut seen = 0usize;

        loop {
            cancel.check()?;
            let Some(item) = source.next().await else {
                break;
            };
            let item = item?;
            if keep_all || reservoir.len() < count {
                reservoir.push(item);
            } else {
                let j = random.below(seen + 1);
                if j < count {
                    reservoir[j] = item;
                }
            }
            seen += 1;
        }

        if keep_all || reservoir.len() < count {
            // Everything seen is in the reservoir; the population is known exactly.
            return self.sample_many(count, &reservoir);
        }
        sets::shuffle_in_place(&mut reservoir, random);
        tracing::debug!(seen, returned = reservoir.len(), "sample_from_stream");
        Ok(reservoir)
    }

    /// A randomly ordered copy of `source`.
    pub fn shuffle<T: Clone>(&self, source: &[T]) -> Vec<T> {
        sets::permutate(source, 1, self.random())
    }

    pub fn permutate<T: Clone>(&self, source: &[T], permutations: usize) -> Vec<T> {
        sets::permutate(source, permutations, self.random())
    }
}

fn replacement(count: usize, available: usize) -> Result<Draw, AccessError> {
    if count > 0 && available == 0 {
        return Err(AccessError::EmptyPopulation);
    }
    Ok(Draw::WithReplacement(count))
}

//! Configuration for the reference store and the sampling services.

use serde::{Deserialize, Serialize};

use crate::AccessError;

/// Settings for [`InMemoryStore`](crate::InMemoryStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name used in log lines and `Unavailable` errors.
    pub name: String,
    /// Deepest specification composition the store will evaluate.
    pub max_specification_depth: usize,
    /// Largest batch accepted by a single call. `None` means unbounded.
    pub max_batch_size: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "in-memory".to_string(),
            max_specification_depth: 32,
            max_batch_size: None,
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, AccessError> {
        serde_json::from_str(json).map_err(|e| AccessError::Config(e.to_string()))
    }

    /// Reject batches larger than `max_batch_size` before touching storage.
    pub(crate) fn check_batch(&self, len: usize) -> Result<(), AccessError> {
        match self.max_batch_size {
            Some(max) if len > max => Err(AccessError::InvalidArgument(format!(
                "batch of {} items exceeds the limit of {} for store '{}'",
                len, max, self.name
            ))),
            _ => Ok(()),
        }
    }
}

/// What a sampler does when asked for more distinct elements than the population holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversamplePolicy {
    /// Fail with `AccessError::SampleExceedsPopulation`.
    #[default]
    Error,
    /// Return the whole population in random order.
    Clamp,
    /// Fall back to independent draws with replacement.
    WithReplacement,
}

/// Settings for [`Sampler`](crate::Sampler) and [`AmbientSampler`](crate::AmbientSampler).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Draw independently for every element instead of without replacement.
    pub with_replacement: bool,
    pub oversample: OversamplePolicy,
    /// Seed for a deterministic generator; entropy when absent.
    pub seed: Option<u64>,
}

impl SamplerConfig {
    pub fn from_json(json: &str) -> Result<Self, AccessError> {
        serde_json::from_str(json).map_err(|e| AccessError::Config(e.to_string()))
    }
}

//! Sampling - uniform random selection from caller-supplied or ambient populations.
//!
//! A [`Sampler`] holds a [`RandomLease`] on a shared [`RandomCapability`] and gives it back
//! when closed or dropped.

mod ambient;
mod random;
mod sampler;

pub use ambient::AmbientSampler;
pub use random::{RandomCapability, RandomLease, RandomSource, ThreadSafeRandom};
pub use sampler::Sampler;

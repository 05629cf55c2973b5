mod accessor;
mod cancel;
mod config;
mod entity;
mod error;
mod in_memory;
mod outcome;
mod repository;
mod sampling;
pub mod sets;
mod specification;
mod stream;

pub use accessor::{Accessor, KeyedAccessor, KeyedStreamAccessor, StreamAccessor};
pub use cancel::Cancellation;
pub use config::{OversamplePolicy, SamplerConfig, StoreConfig};
pub use entity::{Entity, EntityKey, Identified, TenantRef, UserRef};
pub use error::AccessError;
pub use in_memory::{InMemoryStore, Validator};
pub use outcome::{BatchOutcome, Failure, Outcome};
pub use repository::{DataOperations, KeyedDataOperations};
pub use sampling::{
    AmbientSampler, RandomCapability, RandomLease, RandomSource, Sampler, ThreadSafeRandom,
};
pub use sets::SetOperator;
pub use specification::{EvaluationMode, Page, Specification};
pub use stream::{drain, per_item, AccessStream};

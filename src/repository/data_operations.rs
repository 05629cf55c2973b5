use async_trait::async_trait;

use crate::accessor::{Accessor, StreamAccessor};
use crate::entity::{EntityKey, Identified};
use crate::outcome::{BatchOutcome, Outcome};
use crate::{AccessError, Cancellation};

/// Add, update and delete for entities that carry their own key.
///
/// Single-item calls return one outcome. `*_many` calls return one aggregate
/// [`BatchOutcome`]. `*_many_distributed` calls return one outcome per input, in input
/// order, so a single bad item does not sink the rest.
///
/// Expected per-item failures are outcomes. `Err` means the whole call failed or was
/// cancelled; in that case no outcome from the call is authoritative.
///
/// A `*_many_distributed` call cancelled part way through returns `Err(Cancelled)`
/// without outcomes, but items applied before the cancellation stay applied. Callers
/// that need to know which items landed should re-read them by key.
#[async_trait]
pub trait DataOperations<T>: Accessor<T> + StreamAccessor<T>
where
    T: Identified + Send + Sync + 'static,
{
    async fn add(&self, entity: T, cancel: &Cancellation)
        -> Result<Outcome<EntityKey>, AccessError>;

    async fn add_many(
        &self,
        entities: Vec<T>,
        cancel: &Cancellation,
    ) -> Result<BatchOutcome<EntityKey>, AccessError>;

    async fn add_many_distributed(
        &self,
        entities: Vec<T>,
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError>;

    async fn update(
        &self,
        entity: T,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError>;

    async fn update_many(
        &self,
        entities: Vec<T>,
        cancel: &Cancellation,
    ) -> Result<BatchOutcome<EntityKey>, AccessError>;

    async fn update_many_distributed(
        &self,
        entities: Vec<T>,
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError>;

    async fn delete(
        &self,
        entity: &T,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError>;

    async fn delete_many(
        &self,
        entities: &[T],
        cancel: &Cancellation,
    ) -> Result<BatchOutcome<EntityKey>, AccessError>;

    async fn delete_many_distributed(
        &self,
        entities: &[T],
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError>;
}

use async_trait::async_trait;

use crate::outcome::Outcome;
use crate::stream::AccessStream;
use crate::{AccessError, Cancellation};

/// Retrieval addressed by key.
///
/// Every requested key gets an outcome. A missing entity is `Outcome::NotFound`,
/// never an omitted entry.
#[async_trait]
pub trait KeyedAccessor<K, T>: Send + Sync
where
    K: Send + Sync + 'static,
    T: Send + 'static,
{
    async fn get_by_key(&self, key: &K, cancel: &Cancellation) -> Result<Outcome<T>, AccessError>;

    /// Everything in the scope `key` addresses. `NotFound` when the scope is empty.
    async fn get_all_for_key(
        &self,
        key: &K,
        cancel: &Cancellation,
    ) -> Result<Outcome<Vec<T>>, AccessError>;

    /// One outcome per requested key, in request order.
    async fn get_all_matching_keys(
        &self,
        keys: &[K],
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<T>>, AccessError>;
}

/// Streaming variant of [`KeyedAccessor`].
pub trait KeyedStreamAccessor<K, T>: Send + Sync
where
    K: Send + Sync + 'static,
    T: Send + 'static,
{
    /// One `Found` per entity in the key's scope, or a single `NotFound` if it is empty.
    fn stream_all_for_key(
        &self,
        key: K,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<T>>, AccessError>;

    /// Exactly one outcome per key, in input order.
    fn stream_matching_keys(
        &self,
        keys: Vec<K>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<T>>, AccessError>;
}

use async_trait::async_trait;

use crate::outcome::Outcome;
use crate::stream::AccessStream;
use crate::{AccessError, Cancellation};

/// Mutations addressed by key, with the payload passed separately.
///
/// Adapters check the key before the payload: an unknown key is `NotFound` even when
/// the payload would also be rejected. Streamed batches yield one outcome per key, in
/// input order, applying each item as it is pulled.
#[async_trait]
pub trait KeyedDataOperations<K, V>: Send + Sync
where
    K: Send + Sync + 'static,
    V: Send + 'static,
{
    async fn add_by_key(
        &self,
        key: K,
        value: V,
        cancel: &Cancellation,
    ) -> Result<Outcome<K>, AccessError>;

    async fn update_by_key(
        &self,
        key: K,
        value: V,
        cancel: &Cancellation,
    ) -> Result<Outcome<K>, AccessError>;

    /// Pairs `keys[i]` with `values[i]`. Unequal lengths are refused before any write.
    fn update_stream(
        &self,
        keys: Vec<K>,
        values: Vec<V>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<K>>, AccessError>;

    async fn delete_by_key(&self, key: K, cancel: &Cancellation) -> Result<Outcome<K>, AccessError>;

    fn delete_stream(
        &self,
        keys: Vec<K>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<K>>, AccessError>;
}

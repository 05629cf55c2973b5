use async_trait::async_trait;

use crate::specification::{EvaluationMode, Specification};
use crate::stream::AccessStream;
use crate::{AccessError, Cancellation};

/// Read-only retrieval returning materialized collections.
#[async_trait]
pub trait Accessor<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Every element. Order is adapter-defined.
    async fn get_all(&self, cancel: &Cancellation) -> Result<Vec<T>, AccessError>;

    /// Exactly the elements satisfying `spec`, ordered and paged as it asks.
    async fn get_all_satisfying(
        &self,
        spec: &Specification<T>,
        cancel: &Cancellation,
    ) -> Result<Vec<T>, AccessError>;

    /// How this adapter would evaluate `spec`. An `Err` means the call would be refused.
    fn evaluation_mode(&self, _spec: &Specification<T>) -> Result<EvaluationMode, AccessError> {
        Ok(EvaluationMode::InMemory)
    }

    async fn get_all_matching<P>(
        &self,
        predicate: P,
        cancel: &Cancellation,
    ) -> Result<Vec<T>, AccessError>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        Self: Sized,
    {
        self.get_all_satisfying(&Specification::new(predicate), cancel)
            .await
    }
}

/// Read-only retrieval producing lazy streams.
///
/// Each call returns a fresh stream with its own cursor. The outer `Result` reports
/// contract violations before anything is read.
pub trait StreamAccessor<T>: Send + Sync
where
    T: Send + 'static,
{
    fn stream_all(&self, cancel: Cancellation) -> Result<AccessStream<'_, T>, AccessError>;

    fn stream_satisfying(
        &self,
        spec: Specification<T>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, T>, AccessError>;

    fn stream_matching<P>(
        &self,
        predicate: P,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, T>, AccessError>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        Self: Sized,
    {
        self.stream_satisfying(Specification::new(predicate), cancel)
    }
}

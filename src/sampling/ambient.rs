use super::Sampler;
use crate::accessor::Accessor;
use crate::specification::Specification;
use crate::stream::AccessStream;
use crate::{AccessError, Cancellation};

/// Sampling over a population the sampler reads itself.
///
/// The population is pulled from `source` on every call, so each draw sees the store as
/// it is at that moment.
pub struct AmbientSampler<S> {
    source: S,
    sampler: Sampler,
}

impl<S> AmbientSampler<S> {
    pub fn new(source: S, sampler: Sampler) -> Self {
        Self { source, sampler }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Release the random capability and hand back the source.
    pub fn close(self) -> S {
        self.sampler.close();
        self.source
    }

    async fn population<T>(
        &self,
        spec: Option<&Specification<T>>,
        cancel: &Cancellation,
    ) -> Result<Vec<T>, AccessError>
    where
        S: Accessor<T>,
        T: Send + 'static,
    {
        let population = match spec {
            Some(spec) => self.source.get_all_satisfying(spec, cancel).await?,
            None => self.source.get_all(cancel).await?,
        };
        tracing::debug!(population = population.len(), "ambient population loaded");
        Ok(population)
    }

    pub async fn sample_one<T>(&self, cancel: &Cancellation) -> Result<T, AccessError>
    where
        S: Accessor<T>,
        T: Clone + Send + 'static,
    {
        let population = self.population(None, cancel).await?;
        self.sampler.sample_one(&population)
    }

    pub async fn sample_many<T>(
        &self,
        count: usize,
        cancel: &Cancellation,
    ) -> Result<Vec<T>, AccessError>
    where
        S: Accessor<T>,
        T: Clone + Send + 'static,
    {
        let population = self.population(None, cancel).await?;
        self.sampler.sample_many(count, &population)
    }

    /// Like [`sample_many`](Self::sample_many), drawing only from elements that satisfy `spec`.
    pub async fn sample_many_satisfying<T>(
        &self,
        count: usize,
        spec: &Specification<T>,
        cancel: &Cancellation,
    ) -> Result<Vec<T>, AccessError>
    where
        S: Accessor<T>,
        T: Clone + Send + 'static,
    {
        let population = self.population(Some(spec), cancel).await?;
        self.sampler.sample_many(count, &population)
    }

    /// Load the population now, then draw lazily as the stream is pulled.
    pub async fn sample_stream<T>(
        &self,
        count: usize,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, T>, AccessError>
    where
        S: Accessor<T>,
        T: Clone + Send + 'static,
    {
        let population = self.population(None, &cancel).await?;
        self.sampler.sample_stream(count, population, cancel)
    }
}

use async_trait::async_trait;

use super::InMemoryStore;
use crate::accessor::{Accessor, KeyedAccessor, KeyedStreamAccessor, StreamAccessor};
use crate::entity::{Entity, EntityKey};
use crate::outcome::Outcome;
use crate::specification::{EvaluationMode, Specification};
use crate::stream::{self, AccessStream};
use crate::{AccessError, Cancellation};

#[async_trait]
impl<V> Accessor<Entity<V>> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get_all(&self, cancel: &Cancellation) -> Result<Vec<Entity<V>>, AccessError> {
        cancel.check()?;
        let all = self.snapshot()?;
        tracing::debug!(store = %self.config.name, count = all.len(), "get_all");
        Ok(all)
    }

    async fn get_all_satisfying(
        &self,
        spec: &Specification<Entity<V>>,
        cancel: &Cancellation,
    ) -> Result<Vec<Entity<V>>, AccessError> {
        self.check_spec(spec)?;
        cancel.check()?;
        let matched = spec.apply(self.snapshot()?);
        tracing::debug!(
            store = %self.config.name,
            spec = spec.label(),
            count = matched.len(),
            "get_all_satisfying"
        );
        Ok(matched)
    }

    fn evaluation_mode(
        &self,
        spec: &Specification<Entity<V>>,
    ) -> Result<EvaluationMode, AccessError> {
        self.check_spec(spec)?;
        Ok(EvaluationMode::InMemory)
    }
}

impl<V> StreamAccessor<Entity<V>> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn stream_all(&self, cancel: Cancellation) -> Result<AccessStream<'_, Entity<V>>, AccessError> {
        tracing::debug!(store = %self.config.name, "stream_all");
        Ok(stream::drain(cancel, move || self.snapshot()))
    }

    fn stream_satisfying(
        &self,
        spec: Specification<Entity<V>>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Entity<V>>, AccessError> {
        self.check_spec(&spec)?;
        tracing::debug!(store = %self.config.name, spec = spec.label(), "stream_satisfying");
        Ok(stream::drain(cancel, move || Ok(spec.apply(self.snapshot()?))))
    }
}

#[async_trait]
impl<V> KeyedAccessor<EntityKey, Entity<V>> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get_by_key(
        &self,
        key: &EntityKey,
        cancel: &Cancellation,
    ) -> Result<Outcome<Entity<V>>, AccessError> {
        cancel.check()?;
        let shelf = self.read("get_by_key")?;
        Ok(shelf.entities.get(key).cloned().into())
    }

    async fn get_all_for_key(
        &self,
        key: &EntityKey,
        cancel: &Cancellation,
    ) -> Result<Outcome<Vec<Entity<V>>>, AccessError> {
        cancel.check()?;
        let scoped = self.read("get_all_for_key")?.scope(key);
        tracing::debug!(store = %self.config.name, tenant = %key.tenant(), count = scoped.len(), "get_all_for_key");
        if scoped.is_empty() {
            Ok(Outcome::NotFound)
        } else {
            Ok(Outcome::Found(scoped))
        }
    }

    async fn get_all_matching_keys(
        &self,
        keys: &[EntityKey],
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<Entity<V>>>, AccessError> {
        self.config.check_batch(keys.len())?;
        cancel.check()?;
        let shelf = self.read("get_all_matching_keys")?;
        let outcomes: Vec<Outcome<Entity<V>>> = keys
            .iter()
            .map(|key| shelf.entities.get(key).cloned().into())
            .collect();
        tracing::debug!(
            store = %self.config.name,
            requested = keys.len(),
            found = outcomes.iter().filter(|o| o.is_found()).count(),
            "get_all_matching_keys"
        );
        Ok(outcomes)
    }
}

impl<V> KeyedStreamAccessor<EntityKey, Entity<V>> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn stream_all_for_key(
        &self,
        key: EntityKey,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<Entity<V>>>, AccessError> {
        Ok(stream::drain(cancel, move || {
            let scoped = self.read("stream_all_for_key")?.scope(&key);
            if scoped.is_empty() {
                return Ok(vec![Outcome::NotFound]);
            }
            Ok(scoped.into_iter().map(Outcome::Found).collect())
        }))
    }

    fn stream_matching_keys(
        &self,
        keys: Vec<EntityKey>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<Entity<V>>>, AccessError> {
        self.config.check_batch(keys.len())?;
        Ok(stream::per_item(cancel, keys, move |key: EntityKey| {
            let shelf = self.read("stream_matching_keys")?;
            Ok(shelf.entities.get(&key).cloned().into())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use chrono::{Duration, Utc};
    use futures::StreamExt;
    use uuid::Uuid;

    fn seeded(values: &[i32]) -> (InMemoryStore<i32>, Vec<EntityKey>) {
        let store = InMemoryStore::<i32>::new();
        let base = Utc::now();
        let mut keys = Vec::new();
        {
            let mut shelf = store.write("seed").unwrap();
            for (i, value) in values.iter().enumerate() {
                let key = EntityKey::from_parts(
                    Uuid::new_v4(),
                    base + Duration::seconds(i as i64),
                    "acme",
                    "alice",
                );
                shelf.insert(Entity::new(key.clone(), *value), None);
                keys.push(key);
            }
        }
        (store, keys)
    }

    #[tokio::test]
    async fn get_all_in_creation_order() {
        let (store, _) = seeded(&[3, 1, 2]);
        let all = store.get_all(&Cancellation::new()).await.unwrap();
        let values: Vec<i32> = all.into_iter().map(Entity::into_value).collect();
        assert_eq!(values, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn predicate_and_spec_agree() {
        let (store, _) = seeded(&[1, 2, 3, 4, 5]);
        let cancel = Cancellation::new();
        let by_predicate = store
            .get_all_matching(|e: &Entity<i32>| e.value() % 2 == 1, &cancel)
            .await
            .unwrap();
        let by_spec = store
            .get_all_satisfying(
                &Specification::named("odd", |e: &Entity<i32>| e.value() % 2 == 1),
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(by_predicate, by_spec);
        assert_eq!(by_spec.len(), 3);
    }

    #[tokio::test]
    async fn cancelled_before_io() {
        let (store, _) = seeded(&[1]);
        let cancel = Cancellation::new();
        cancel.cancel();
        assert_eq!(store.get_all(&cancel).await, Err(AccessError::Cancelled));
    }

    #[tokio::test]
    async fn deep_spec_refused_before_stream_exists() {
        let store = InMemoryStore::<i32>::with_config(StoreConfig {
            max_specification_depth: 1,
            ..StoreConfig::default()
        });
        let spec = Specification::new(|_: &Entity<i32>| true).not();
        assert!(store.evaluation_mode(&spec).is_err());
        assert!(matches!(
            store.stream_satisfying(spec, Cancellation::new()),
            Err(AccessError::UnsupportedSpecification { .. })
        ));
    }

    #[tokio::test]
    async fn scope_stream_reports_empty_scope() {
        let (store, _) = seeded(&[1, 2]);
        let stranger = EntityKey::new("globex", "bob");
        let outcomes: Vec<_> = store
            .stream_all_for_key(stranger, Cancellation::new())
            .unwrap()
            .collect()
            .await;
        assert_eq!(outcomes, vec![Ok(Outcome::NotFound)]);
    }

    #[tokio::test]
    async fn matching_keys_stream_one_outcome_per_key() {
        let (store, keys) = seeded(&[10, 20]);
        let missing = EntityKey::new("acme", "alice");
        let requested = vec![keys[1].clone(), missing, keys[0].clone()];

        let outcomes: Vec<Outcome<i32>> = store
            .stream_matching_keys(requested, Cancellation::new())
            .unwrap()
            .map(|item| item.unwrap().map(Entity::into_value))
            .collect()
            .await;
        assert_eq!(
            outcomes,
            vec![Outcome::Found(20), Outcome::NotFound, Outcome::Found(10)]
        );
    }
}

use std::collections::HashSet;

use async_trait::async_trait;

use super::{InMemoryStore, Shelf};
use crate::entity::{Entity, EntityKey};
use crate::outcome::{BatchOutcome, Outcome};
use crate::repository::{DataOperations, KeyedDataOperations};
use crate::stream::{self, AccessStream};
use crate::{AccessError, Cancellation};

impl<V> InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Apply `op` to each input in order, yielding between items.
    ///
    /// Cancellation stops the loop with `Err(Cancelled)`; items applied before it stay applied.
    async fn distributed<I, F>(
        &self,
        operation: &'static str,
        inputs: Vec<I>,
        cancel: &Cancellation,
        mut op: F,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError>
    where
        I: Send,
        F: FnMut(&mut Shelf<V>, I) -> Outcome<EntityKey> + Send,
    {
        self.config.check_batch(inputs.len())?;
        let mut outcomes = Vec::with_capacity(inputs.len());
        for input in inputs {
            cancel.check()?;
            let outcome = {
                let mut shelf = self.write(operation)?;
                op(&mut *shelf, input)
            };
            outcomes.push(outcome);
            tokio::task::yield_now().await;
        }
        tracing::debug!(
            store = %self.config.name,
            operation,
            total = outcomes.len(),
            applied = outcomes.iter().filter(|o| o.is_found()).count(),
            "distributed batch"
        );
        Ok(outcomes)
    }

    /// Check every input with `admit`, then apply all of them with `apply` or none.
    fn atomic<I, A, F>(
        &self,
        operation: &'static str,
        inputs: Vec<I>,
        cancel: &Cancellation,
        admit: A,
        mut apply: F,
    ) -> Result<BatchOutcome<EntityKey>, AccessError>
    where
        A: Fn(&Shelf<V>, &I, &HashSet<EntityKey>) -> Outcome<EntityKey>,
        F: FnMut(&mut Shelf<V>, I),
    {
        self.config.check_batch(inputs.len())?;
        cancel.check()?;
        let mut shelf = self.write(operation)?;

        let mut pending = HashSet::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            match admit(&*shelf, input, &pending) {
                Outcome::Found(key) => {
                    pending.insert(key);
                }
                refused => {
                    tracing::warn!(store = %self.config.name, operation, index, "batch rejected");
                    return Ok(BatchOutcome::Rejected {
                        index,
                        outcome: refused,
                    });
                }
            }
        }

        let count = inputs.len();
        for input in inputs {
            apply(&mut *shelf, input);
        }
        tracing::debug!(store = %self.config.name, operation, count, "batch applied");
        Ok(BatchOutcome::Applied { count })
    }
}

#[async_trait]
impl<V> DataOperations<Entity<V>> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn add(
        &self,
        entity: Entity<V>,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError> {
        cancel.check()?;
        let mut shelf = self.write("add")?;
        Ok(shelf.insert(entity, self.validator.as_ref()))
    }

    async fn add_many(
        &self,
        entities: Vec<Entity<V>>,
        cancel: &Cancellation,
    ) -> Result<BatchOutcome<EntityKey>, AccessError> {
        let validator = self.validator.as_ref();
        self.atomic(
            "add_many",
            entities,
            cancel,
            |shelf, entity, pending| shelf.admit_insert(entity, pending, validator),
            |shelf, entity| {
                shelf.entities.insert(entity.key().clone(), entity);
            },
        )
    }

    async fn add_many_distributed(
        &self,
        entities: Vec<Entity<V>>,
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError> {
        let validator = self.validator.as_ref();
        self.distributed("add_many_distributed", entities, cancel, |shelf, entity| {
            shelf.insert(entity, validator)
        })
        .await
    }

    async fn update(
        &self,
        entity: Entity<V>,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError> {
        cancel.check()?;
        let mut shelf = self.write("update")?;
        Ok(shelf.replace(entity, self.validator.as_ref()))
    }

    async fn update_many(
        &self,
        entities: Vec<Entity<V>>,
        cancel: &Cancellation,
    ) -> Result<BatchOutcome<EntityKey>, AccessError> {
        let validator = self.validator.as_ref();
        self.atomic(
            "update_many",
            entities,
            cancel,
            |shelf, entity, _| shelf.admit_replace(entity, validator),
            |shelf, entity| {
                shelf.replace(entity, None);
            },
        )
    }

    async fn update_many_distributed(
        &self,
        entities: Vec<Entity<V>>,
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError> {
        let validator = self.validator.as_ref();
        self.distributed("update_many_distributed", entities, cancel, |shelf, entity| {
            shelf.replace(entity, validator)
        })
        .await
    }

    async fn delete(
        &self,
        entity: &Entity<V>,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError> {
        cancel.check()?;
        let mut shelf = self.write("delete")?;
        Ok(shelf.remove(entity.key()))
    }

    async fn delete_many(
        &self,
        entities: &[Entity<V>],
        cancel: &Cancellation,
    ) -> Result<BatchOutcome<EntityKey>, AccessError> {
        let keys: Vec<&EntityKey> = entities.iter().map(Entity::key).collect();
        self.atomic(
            "delete_many",
            keys,
            cancel,
            |shelf, key, pending| shelf.admit_remove(key, pending),
            |shelf, key| {
                shelf.remove(key);
            },
        )
    }

    async fn delete_many_distributed(
        &self,
        entities: &[Entity<V>],
        cancel: &Cancellation,
    ) -> Result<Vec<Outcome<EntityKey>>, AccessError> {
        let keys: Vec<&EntityKey> = entities.iter().map(Entity::key).collect();
        self.distributed("delete_many_distributed", keys, cancel, |shelf, key| {
            shelf.remove(key)
        })
        .await
    }
}

#[async_trait]
impl<V> KeyedDataOperations<EntityKey, V> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn add_by_key(
        &self,
        key: EntityKey,
        value: V,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError> {
        cancel.check()?;
        let mut shelf = self.write("keyed add")?;
        Ok(shelf.insert(Entity::new(key, value), self.validator.as_ref()))
    }

    async fn update_by_key(
        &self,
        key: EntityKey,
        value: V,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError> {
        cancel.check()?;
        let mut shelf = self.write("keyed update")?;
        Ok(shelf.replace(Entity::new(key, value), self.validator.as_ref()))
    }

    fn update_stream(
        &self,
        keys: Vec<EntityKey>,
        values: Vec<V>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<EntityKey>>, AccessError> {
        if keys.len() != values.len() {
            return Err(AccessError::InvalidArgument(format!(
                "{} keys paired with {} values",
                keys.len(),
                values.len()
            )));
        }
        self.config.check_batch(keys.len())?;

        let pairs: Vec<(EntityKey, V)> = keys.into_iter().zip(values).collect();
        Ok(stream::per_item(cancel, pairs, move |(key, value)| {
            let mut shelf = self.write("update_stream")?;
            Ok(shelf.replace(Entity::new(key, value), self.validator.as_ref()))
        }))
    }

    async fn delete_by_key(
        &self,
        key: EntityKey,
        cancel: &Cancellation,
    ) -> Result<Outcome<EntityKey>, AccessError> {
        cancel.check()?;
        let mut shelf = self.write("keyed delete")?;
        Ok(shelf.remove(&key))
    }

    fn delete_stream(
        &self,
        keys: Vec<EntityKey>,
        cancel: Cancellation,
    ) -> Result<AccessStream<'_, Outcome<EntityKey>>, AccessError> {
        self.config.check_batch(keys.len())?;
        Ok(stream::per_item(cancel, keys, move |key: EntityKey| {
            let mut shelf = self.write("delete_stream")?;
            Ok(shelf.remove(&key))
        }))
    }
}

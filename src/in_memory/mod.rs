//! InMemoryStore - HashMap-backed reference adapter for testing and development.
//!
//! Implements every accessor and repository contract in the crate over
//! [`Entity<V>`](crate::Entity) values keyed by [`EntityKey`].

mod read;
mod write;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StoreConfig;
use crate::entity::{Entity, EntityKey, TenantRef, UserRef};
use crate::outcome::{Failure, Outcome};
use crate::specification::Specification;
use crate::AccessError;

/// Payload check applied to every added or updated value.
pub type Validator<V> = Arc<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

struct Shelf<V> {
    entities: HashMap<EntityKey, Entity<V>>,
    /// Keys of deleted entities. Never accepted again.
    retired: HashSet<EntityKey>,
    open: bool,
}

impl<V> Shelf<V> {
    fn new() -> Self {
        Shelf {
            entities: HashMap::new(),
            retired: HashSet::new(),
            open: true,
        }
    }

    fn admit_insert(
        &self,
        entity: &Entity<V>,
        pending: &HashSet<EntityKey>,
        validator: Option<&Validator<V>>,
    ) -> Outcome<EntityKey> {
        let key = entity.key();
        if self.entities.contains_key(key) || pending.contains(key) {
            return Outcome::Failed(Failure::Conflict(format!("key {} already exists", key)));
        }
        if self.retired.contains(key) {
            return Outcome::Failed(Failure::Conflict(format!("key {} was retired", key)));
        }
        match check_payload(validator, entity.value()) {
            Ok(()) => Outcome::Found(key.clone()),
            Err(failure) => Outcome::Failed(failure),
        }
    }

    fn admit_replace(&self, entity: &Entity<V>, validator: Option<&Validator<V>>) -> Outcome<EntityKey> {
        let Some(stored) = self.entities.get(entity.key()) else {
            return Outcome::NotFound;
        };
        match check_payload(validator, entity.value()) {
            Ok(()) => Outcome::Found(stored.key().clone()),
            Err(failure) => Outcome::Failed(failure),
        }
    }

    fn admit_remove(&self, key: &EntityKey, pending: &HashSet<EntityKey>) -> Outcome<EntityKey> {
        match self.entities.get(key) {
            Some(stored) if !pending.contains(key) => Outcome::Found(stored.key().clone()),
            _ => Outcome::NotFound,
        }
    }

    fn insert(&mut self, entity: Entity<V>, validator: Option<&Validator<V>>) -> Outcome<EntityKey> {
        let outcome = self.admit_insert(&entity, &HashSet::new(), validator);
        if outcome.is_found() {
            self.entities.insert(entity.key().clone(), entity);
        }
        outcome
    }

    /// Replace the value under an existing key. The stored key, with its original
    /// metadata, is kept.
    fn replace(&mut self, entity: Entity<V>, validator: Option<&Validator<V>>) -> Outcome<EntityKey> {
        let outcome = self.admit_replace(&entity, validator);
        if let Outcome::Found(stored_key) = &outcome {
            let (_, value) = entity.into_parts();
            self.entities
                .insert(stored_key.clone(), Entity::new(stored_key.clone(), value));
        }
        outcome
    }

    fn remove(&mut self, key: &EntityKey) -> Outcome<EntityKey> {
        match self.entities.remove(key) {
            Some(removed) => {
                let key = removed.key().clone();
                self.retired.insert(key.clone());
                Outcome::Found(key)
            }
            None => Outcome::NotFound,
        }
    }
}

impl<V: Clone> Shelf<V> {
    /// All entities ordered by creation time.
    fn listing(&self) -> Vec<Entity<V>> {
        let mut all: Vec<Entity<V>> = self.entities.values().cloned().collect();
        all.sort_by(|a, b| a.key().creation_order(b.key()));
        all
    }

    fn scope(&self, key: &EntityKey) -> Vec<Entity<V>> {
        let mut scoped: Vec<Entity<V>> = self
            .entities
            .values()
            .filter(|entity| entity.key().same_scope(key))
            .cloned()
            .collect();
        scoped.sort_by(|a, b| a.key().creation_order(b.key()));
        scoped
    }
}

fn check_payload<V>(validator: Option<&Validator<V>>, value: &V) -> Result<(), Failure> {
    match validator {
        Some(validate) => validate(value).map_err(Failure::Invalid),
        None => Ok(()),
    }
}

/// In-memory store of `Entity<V>`.
///
/// Clone-friendly via Arc; clones share storage. Listings are ordered by creation time
/// unless a specification orders them. Batch calls without the `_distributed` suffix
/// are atomic: if any item is refused, nothing is written.
pub struct InMemoryStore<V> {
    shelf: Arc<RwLock<Shelf<V>>>,
    config: Arc<StoreConfig>,
    validator: Option<Validator<V>>,
}

impl<V> Clone for InMemoryStore<V> {
    fn clone(&self) -> Self {
        Self {
            shelf: Arc::clone(&self.shelf),
            config: Arc::clone(&self.config),
            validator: self.validator.clone(),
        }
    }
}

impl<V> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> InMemoryStore<V> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            shelf: Arc::new(RwLock::new(Shelf::new())),
            config: Arc::new(config),
            validator: None,
        }
    }

    /// Reject added or updated payloads for which `validate` returns `Err`.
    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&V) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validate));
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Mint a key for a new entity owned by this store.
    pub fn issue_key(&self, tenant: impl Into<TenantRef>, creator: impl Into<UserRef>) -> EntityKey {
        EntityKey::new(tenant, creator)
    }

    /// Close the store. Every later call fails with `AccessError::Unavailable`.
    pub fn close(&self) -> Result<(), AccessError> {
        let mut shelf = self
            .shelf
            .write()
            .map_err(|_| AccessError::lock_poisoned("close"))?;
        shelf.open = false;
        tracing::debug!(store = %self.config.name, "store closed");
        Ok(())
    }

    pub fn len(&self) -> Result<usize, AccessError> {
        Ok(self.read("len")?.entities.len())
    }

    pub fn is_empty(&self) -> Result<bool, AccessError> {
        Ok(self.len()? == 0)
    }

    fn read(&self, operation: &str) -> Result<RwLockReadGuard<'_, Shelf<V>>, AccessError> {
        let shelf = self
            .shelf
            .read()
            .map_err(|_| AccessError::lock_poisoned(operation))?;
        if !shelf.open {
            return Err(self.unavailable(operation));
        }
        Ok(shelf)
    }

    fn write(&self, operation: &str) -> Result<RwLockWriteGuard<'_, Shelf<V>>, AccessError> {
        let shelf = self
            .shelf
            .write()
            .map_err(|_| AccessError::lock_poisoned(operation))?;
        if !shelf.open {
            return Err(self.unavailable(operation));
        }
        Ok(shelf)
    }

    fn unavailable(&self, operation: &str) -> AccessError {
        tracing::warn!(store = %self.config.name, operation, "call against closed store");
        AccessError::Unavailable(self.config.name.clone())
    }

    /// Refuse specifications nested deeper than the configured limit.
    fn check_spec<T>(&self, spec: &Specification<T>) -> Result<(), AccessError> {
        let max_depth = self.config.max_specification_depth;
        if spec.depth() > max_depth {
            return Err(AccessError::UnsupportedSpecification {
                label: spec.label().to_string(),
                depth: spec.depth(),
                max_depth,
            });
        }
        Ok(())
    }
}

impl<V: Clone> InMemoryStore<V> {
    fn snapshot(&self) -> Result<Vec<Entity<V>>, AccessError> {
        Ok(self.read("scan")?.listing())
    }
}

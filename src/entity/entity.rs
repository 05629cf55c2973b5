use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::EntityKey;

/// Anything addressable by an [`EntityKey`].
pub trait Identified {
    fn key(&self) -> &EntityKey;
}

/// A domain value together with its key.
///
/// Equality and ordering compare the value only, so entities sort and dedupe the way
/// their payloads do. Compare keys explicitly when identity matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity<T> {
    key: EntityKey,
    value: T,
}

impl<T> Entity<T> {
    pub fn new(key: EntityKey, value: T) -> Self {
        Entity { key, value }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (EntityKey, T) {
        (self.key, self.value)
    }

    /// Replace the value, keeping the key.
    pub fn with_value<U>(self, value: U) -> Entity<U> {
        Entity {
            key: self.key,
            value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Entity<U> {
        Entity {
            key: self.key,
            value: f(self.value),
        }
    }
}

impl<T> Identified for Entity<T> {
    fn key(&self) -> &EntityKey {
        &self.key
    }
}

impl<T: PartialEq> PartialEq for Entity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Entity<T> {}

impl<T: PartialOrd> PartialOrd for Entity<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Ord> Ord for Entity<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

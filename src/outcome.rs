//! Outcome - per-item results that never throw.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an item was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Failure {
    /// The item collides with existing state (duplicate key, retired key).
    Conflict(String),
    /// The payload failed validation.
    Invalid(String),
    /// The adapter refused the item for any other reason.
    Rejected(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Conflict(msg) => write!(f, "conflict: {}", msg),
            Failure::Invalid(msg) => write!(f, "invalid: {}", msg),
            Failure::Rejected(msg) => write!(f, "rejected: {}", msg),
        }
    }
}

/// Result of a single item of an operation.
///
/// Mutations report `Found` with the affected key on success; reads report `Found`
/// with the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T> {
    Found(T),
    NotFound,
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Found(value) => Outcome::Found(value),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Failed(failure) => Outcome::Failed(failure.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Failed(failure) => Outcome::Failed(failure),
        }
    }

    /// Drop the payload, keeping only the status.
    pub fn status(&self) -> Outcome<()> {
        self.as_ref().map(|_| ())
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Found(value),
            None => Outcome::NotFound,
        }
    }
}

/// Aggregate result of an all-or-aggregate batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOutcome<K> {
    /// Every item was applied.
    Applied { count: usize },
    /// The batch was refused. `index` is the first offending input and `outcome`
    /// its non-`Found` result.
    Rejected { index: usize, outcome: Outcome<K> },
}

impl<K> BatchOutcome<K> {
    pub fn is_applied(&self) -> bool {
        matches!(self, BatchOutcome::Applied { .. })
    }

    pub fn applied_count(&self) -> usize {
        match self {
            BatchOutcome::Applied { count } => *count,
            BatchOutcome::Rejected { .. } => 0,
        }
    }
}

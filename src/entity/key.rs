use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The tenant an entity originated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantRef(String);

impl TenantRef {
    pub fn new(id: impl Into<String>) -> Self {
        TenantRef(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantRef {
    fn from(id: &str) -> Self {
        TenantRef::new(id)
    }
}

impl fmt::Display for TenantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user who created an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserRef(String);

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        UserRef(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserRef {
    fn from(id: &str) -> Self {
        UserRef::new(id)
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage-independent identity of an entity.
///
/// Issued once by the owning adapter when the entity is created and never mutated.
/// Two keys are equal when they share tenant and id; `created_at` and `creator`
/// describe the entity but do not take part in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityKey {
    id: Uuid,
    created_at: DateTime<Utc>,
    tenant: TenantRef,
    creator: UserRef,
}

impl EntityKey {
    /// Mint a fresh key stamped with the current time.
    pub fn new(tenant: impl Into<TenantRef>, creator: impl Into<UserRef>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            tenant: tenant.into(),
            creator: creator.into(),
        }
    }

    /// Rebuild a key that was issued earlier.
    pub fn from_parts(
        id: Uuid,
        created_at: DateTime<Utc>,
        tenant: impl Into<TenantRef>,
        creator: impl Into<UserRef>,
    ) -> Self {
        Self {
            id,
            created_at,
            tenant: tenant.into(),
            creator: creator.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tenant(&self) -> &TenantRef {
        &self.tenant
    }

    pub fn creator(&self) -> &UserRef {
        &self.creator
    }

    /// Whether both keys address the same tenant scope.
    pub fn same_scope(&self, other: &EntityKey) -> bool {
        self.tenant == other.tenant
    }

    /// Total order by creation time, then id. Used for stable listings.
    pub fn creation_order(&self, other: &EntityKey) -> std::cmp::Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialEq for EntityKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tenant == other.tenant
    }
}

impl Eq for EntityKey {}

impl Hash for EntityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tenant.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    #[test]
    fn fresh_keys_are_unique() {
        let a = EntityKey::new("acme", "alice");
        let b = EntityKey::new("acme", "alice");
        assert_ne!(a, b);
        assert!(a.same_scope(&b));
    }

    #[test]
    fn identity_ignores_metadata() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let a = EntityKey::from_parts(id, now, "acme", "alice");
        let b = EntityKey::from_parts(id, now + Duration::seconds(5), "acme", "bob");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn same_id_in_another_tenant_is_another_entity() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let a = EntityKey::from_parts(id, now, "acme", "alice");
        let b = EntityKey::from_parts(id, now, "globex", "alice");
        assert_ne!(a, b);
        assert!(!a.same_scope(&b));
    }

    #[test]
    fn creation_order_uses_timestamp_first() {
        let now = Utc::now();
        let early = EntityKey::from_parts(Uuid::new_v4(), now - Duration::seconds(1), "t", "u");
        let late = EntityKey::from_parts(Uuid::new_v4(), now, "t", "u");
        assert_eq!(early.creation_order(&late), std::cmp::Ordering::Less);
    }

    #[test]
    fn serde_round_trip_keeps_metadata() {
        let key = EntityKey::new("acme", "alice");
        let json = serde_json::to_string(&key).unwrap();
        let back: EntityKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert_eq!(back.created_at(), key.created_at());
        assert_eq!(back.creator(), key.creator());
    }
}

//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use access_rust::{Cancellation, DataOperations, Entity, EntityKey, InMemoryStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub title: String,
    pub priority: u8,
}

impl Ticket {
    pub fn new(title: &str, priority: u8) -> Self {
        Self {
            title: title.to_string(),
            priority,
        }
    }
}

/// A fixed point in time so creation-order assertions are stable.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn key_at(tenant: &str, offset_secs: i64) -> EntityKey {
    EntityKey::from_parts(
        Uuid::new_v4(),
        t0() + Duration::seconds(offset_secs),
        tenant,
        "alice",
    )
}

pub fn ticket_at(tenant: &str, offset_secs: i64, title: &str, priority: u8) -> Entity<Ticket> {
    Entity::new(key_at(tenant, offset_secs), Ticket::new(title, priority))
}

/// A store holding `tickets`, added one by one.
pub async fn store_with(tickets: Vec<Entity<Ticket>>) -> InMemoryStore<Ticket> {
    let store = InMemoryStore::new();
    let cancel = Cancellation::new();
    for ticket in tickets {
        let outcome = store.add(ticket, &cancel).await.unwrap();
        assert!(outcome.is_found());
    }
    store
}

/// Five tickets in tenant "acme", one second apart starting at `t0()`.
pub fn backlog() -> Vec<Entity<Ticket>> {
    vec![
        ticket_at("acme", 0, "login broken", 1),
        ticket_at("acme", 1, "typo on pricing page", 4),
        ticket_at("acme", 2, "export times out", 2),
        ticket_at("acme", 3, "dark mode", 5),
        ticket_at("acme", 4, "slow search", 2),
    ]
}

pub fn titles(entities: &[Entity<Ticket>]) -> Vec<String> {
    entities.iter().map(|e| e.value().title.clone()).collect()
}

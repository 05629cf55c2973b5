mod entity;
mod key;

pub use entity::{Entity, Identified};
pub use key::{EntityKey, TenantRef, UserRef};

mod accessor;
mod keyed;

pub use accessor::{Accessor, StreamAccessor};
pub use keyed::{KeyedAccessor, KeyedStreamAccessor};

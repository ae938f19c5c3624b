//! Nearby campaign events.
//!
//! A zip code is geocoded, the resulting point is turned into a radius and
//! start-time search, and the hits are deserialized into [`Event`]s.

mod deserializer;
mod repository;
mod types;

pub use self::deserializer::*;
pub use self::repository::*;
pub use self::types::*;

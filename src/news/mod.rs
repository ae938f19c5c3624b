//! Campaign news feed.

mod deserializer;
mod repository;
mod types;

pub use self::deserializer::*;
pub use self::repository::*;
pub use self::types::*;

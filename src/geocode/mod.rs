//! Zip code and address resolution.

mod client;
mod types;

pub use self::client::*;
pub use self::types::*;

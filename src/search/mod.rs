//! Search backend access: request bodies and the JSON transport.

mod client;
mod query;

pub use self::client::*;
pub use self::query::*;

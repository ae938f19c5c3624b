pub mod dispatch;
pub mod environment;
pub mod error;
pub mod events;
pub mod geocode;
pub mod http;
pub mod logging;
pub mod news;
pub mod search;
pub mod urls;
pub mod util;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_GEOCODE: &str = "geocode";
pub const TARGET_DISPATCH: &str = "dispatch";

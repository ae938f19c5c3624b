//! HTTP client creation shared by the geocoder and the search client.

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

use crate::TARGET_WEB_REQUEST;

/// Create a client that sends the given user agent and accepts JSON
pub fn create_http_client(user_agent: &str) -> Result<reqwest::Client> {
    debug!(target: TARGET_WEB_REQUEST, "Creating HTTP client with user agent {}", user_agent);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .gzip(true)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

//! JSON transport capability and its reqwest implementation.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::environment::Settings;
use crate::error::TransportError;
use crate::http::create_http_client;
use crate::TARGET_WEB_REQUEST;

/// Sends JSON request bodies and returns the parsed JSON response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonClient: Send + Sync {
    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonClient {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpJsonClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: create_http_client(&settings.user_agent)?,
            request_timeout: settings.request_timeout,
        })
    }
}

#[async_trait]
impl JsonClient for HttpJsonClient {
    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value, TransportError> {
        debug!(target: TARGET_WEB_REQUEST, "POST {} with body {}", url, body);

        let request = async {
            let response = self
                .client
                .post(url.clone())
                .json(body)
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            if !response.status().is_success() {
                warn!(target: TARGET_WEB_REQUEST, "Non-success status {} from {}", response.status(), url);
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: response.status().as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))
        };

        let text = timeout(self.request_timeout, request)
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.to_string(),
                seconds: self.request_timeout.as_secs(),
            })??;

        // Log the first few characters of the response body for debugging
        debug!(target: TARGET_WEB_REQUEST, "First 500 characters of response body: {}", &text.chars().take(500).collect::<String>());

        serde_json::from_str(&text).map_err(|e| TransportError::InvalidJson(e.to_string()))
    }
}

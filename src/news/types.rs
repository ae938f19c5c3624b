//! Type definitions for the news module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A published news article. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    title: String,
    date: DateTime<Utc>,
    body: String,
    image_url: Option<Url>,
    url: Url,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        date: DateTime<Utc>,
        body: impl Into<String>,
        image_url: Option<Url>,
        url: Url,
    ) -> Self {
        Self {
            title: title.into(),
            date,
            body: body.into(),
            image_url,
            url,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// `_source` document of a news search hit
#[derive(Debug, Deserialize)]
pub(crate) struct RawNewsItem {
    pub title: Option<String>,
    #[serde(alias = "published_at")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub url: Option<String>,
}

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::types::{NewsItem, RawNewsItem};
use crate::util::{parse_date, search_hit_sources};
use crate::TARGET_WEB_REQUEST;

/// Turns a news search response into news items, skipping hits it cannot use.
#[cfg_attr(test, mockall::automock)]
pub trait NewsItemDeserializer: Send + Sync {
    fn deserialize_news_items(&self, json: &Value) -> Vec<NewsItem>;
}

#[derive(Debug, Clone, Default)]
pub struct StockNewsItemDeserializer;

impl StockNewsItemDeserializer {
    pub fn new() -> Self {
        Self
    }
}

impl NewsItemDeserializer for StockNewsItemDeserializer {
    fn deserialize_news_items(&self, json: &Value) -> Vec<NewsItem> {
        let items: Vec<NewsItem> = search_hit_sources(json)
            .filter_map(|source| match RawNewsItem::deserialize(source) {
                Ok(raw) => news_item_from_raw(raw),
                Err(err) => {
                    warn!(target: TARGET_WEB_REQUEST, "Skipping malformed news item: {}", err);
                    None
                }
            })
            .collect();

        debug!(target: TARGET_WEB_REQUEST, "Deserialized {} news items", items.len());
        items
    }
}

fn news_item_from_raw(raw: RawNewsItem) -> Option<NewsItem> {
    let Some(title) = raw.title.filter(|title| !title.trim().is_empty()) else {
        warn!(target: TARGET_WEB_REQUEST, "News item missing title, skipping");
        return None;
    };

    let Some(date) = raw.created_at.as_deref().and_then(parse_date) else {
        warn!(target: TARGET_WEB_REQUEST, "News item '{}' has no usable date, skipping", title);
        return None;
    };

    let Some(url) = raw.url.as_deref().and_then(|url| Url::parse(url).ok()) else {
        warn!(target: TARGET_WEB_REQUEST, "News item '{}' has no valid url, skipping", title);
        return None;
    };

    // Invalid image URLs become None
    let image_url = raw
        .image_url
        .as_deref()
        .filter(|image_url| !image_url.is_empty())
        .and_then(|image_url| Url::parse(image_url).ok());

    Some(NewsItem::new(
        title,
        date,
        raw.body.unwrap_or_default(),
        image_url,
        url,
    ))
}

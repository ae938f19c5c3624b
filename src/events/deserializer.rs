use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::types::{Event, RawEvent, Venue};
use crate::geocode::Coordinate;
use crate::util::{parse_date, search_hit_sources};
use crate::TARGET_WEB_REQUEST;

/// Turns an events search response into events. Never fails: hits that cannot be
/// turned into an [`Event`] are skipped.
#[cfg_attr(test, mockall::automock)]
pub trait EventDeserializer: Send + Sync {
    fn deserialize_events(&self, json: &Value) -> Vec<Event>;
}

#[derive(Debug, Clone, Default)]
pub struct StockEventDeserializer;

impl StockEventDeserializer {
    pub fn new() -> Self {
        Self
    }
}

impl EventDeserializer for StockEventDeserializer {
    fn deserialize_events(&self, json: &Value) -> Vec<Event> {
        let events: Vec<Event> = search_hit_sources(json)
            .filter_map(|source| match RawEvent::deserialize(source) {
                Ok(raw) => event_from_raw(raw),
                Err(err) => {
                    warn!(target: TARGET_WEB_REQUEST, "Skipping malformed event: {}", err);
                    None
                }
            })
            .collect();

        debug!(target: TARGET_WEB_REQUEST, "Deserialized {} events", events.len());
        events
    }
}

fn event_from_raw(raw: RawEvent) -> Option<Event> {
    let Some(name) = raw.name.filter(|name| !name.trim().is_empty()) else {
        warn!(target: TARGET_WEB_REQUEST, "Event missing name, skipping");
        return None;
    };

    let Some(start_time) = raw.start_time.as_deref().and_then(parse_date) else {
        warn!(target: TARGET_WEB_REQUEST, "Event '{}' has no usable start_time, skipping", name);
        return None;
    };

    let Some(url) = raw.url.as_deref().and_then(|url| Url::parse(url).ok()) else {
        warn!(target: TARGET_WEB_REQUEST, "Event '{}' has no valid url, skipping", name);
        return None;
    };

    let Some(raw_venue) = raw.venue else {
        warn!(target: TARGET_WEB_REQUEST, "Event '{}' has no venue, skipping", name);
        return None;
    };

    let Some(point) = raw_venue.location else {
        warn!(target: TARGET_WEB_REQUEST, "Event '{}' venue has no location, skipping", name);
        return None;
    };

    let mut venue = Venue::new(Coordinate::new(point.lat, point.lon)).with_address(
        raw_venue.address,
        raw_venue.city,
        raw_venue.state,
        raw_venue.zip,
    );
    if let Some(venue_name) = raw_venue.name {
        venue = venue.with_name(venue_name);
    }

    Some(
        Event::new(name, start_time, venue, url)
            .with_timezone(raw.timezone)
            .with_description(raw.description.unwrap_or_default())
            .with_attendance(raw.attendee_count.unwrap_or(0), raw.capacity.unwrap_or(0)),
    )
}

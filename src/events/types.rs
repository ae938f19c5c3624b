//! Type definitions for the events module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::geocode::Coordinate;

/// Where an event takes place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    location: Coordinate,
}

impl Venue {
    pub fn new(location: Coordinate) -> Self {
        Self {
            name: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            location,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(
        mut self,
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        zip: Option<String>,
    ) -> Self {
        self.address = address;
        self.city = city;
        self.state = state;
        self.zip = zip;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn zip(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Single-line address made of whichever parts are present.
    pub fn formatted_address(&self) -> String {
        let city_state = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        [self.address.as_deref(), Some(city_state.as_str()), self.zip.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A campaign event returned by the events search. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    name: String,
    start_time: DateTime<Utc>,
    timezone: Option<String>,
    venue: Venue,
    description: String,
    url: Url,
    attendee_count: u32,
    capacity: u32,
}

impl Event {
    pub fn new(name: impl Into<String>, start_time: DateTime<Utc>, venue: Venue, url: Url) -> Self {
        Self {
            name: name.into(),
            start_time,
            timezone: None,
            venue,
            description: String::new(),
            url,
            attendee_count: 0,
            capacity: 0,
        }
    }

    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_attendance(mut self, attendee_count: u32, capacity: u32) -> Self {
        self.attendee_count = attendee_count;
        self.capacity = capacity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn attendee_count(&self) -> u32 {
        self.attendee_count
    }

    /// Zero means the organizer set no limit.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// `_source` document of an events search hit
#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub url: Option<String>,
    pub venue: Option<RawVenue>,
    #[serde(default)]
    pub attendee_count: Option<u32>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVenue {
    pub name: Option<String>,
    #[serde(alias = "address1")]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub location: Option<RawGeoPoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeoPoint {
    pub lat: f64,
    pub lon: f64,
}

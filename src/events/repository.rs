//! Event lookup by zip code and radius.

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::deserializer::EventDeserializer;
use super::types::Event;
use crate::dispatch::Dispatcher;
use crate::error::{FetchError, GeocodeError};
use crate::geocode::Geocoder;
use crate::search::{events_query, JsonClient};
use crate::urls::UrlProvider;
use crate::{TARGET_GEOCODE, TARGET_WEB_REQUEST};

pub type EventsCompletion = Box<dyn FnOnce(Vec<Event>) + Send + 'static>;
pub type ErrorCompletion = Box<dyn FnOnce(FetchError) + Send + 'static>;

pub trait EventRepository: Send + Sync {
    /// Finds events within `radius_miles` of `zip_code` that start in the next six months.
    ///
    /// Exactly one of `completion` or `error` is called. Both are called on the
    /// repository's dispatcher, except for geocoding failures, which are reported
    /// directly from the fetch task.
    fn fetch_events_with_zip_code(
        &self,
        zip_code: &str,
        radius_miles: f32,
        completion: EventsCompletion,
        error: ErrorCompletion,
    ) -> JoinHandle<()>;
}

#[derive(Clone)]
pub struct ConcreteEventRepository {
    geocoder: Arc<dyn Geocoder>,
    url_provider: Arc<dyn UrlProvider>,
    json_client: Arc<dyn JsonClient>,
    event_deserializer: Arc<dyn EventDeserializer>,
    operation_queue: Arc<dyn Dispatcher>,
    runtime: Handle,
}

impl ConcreteEventRepository {
    /// Builds a repository whose fetches run on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        url_provider: Arc<dyn UrlProvider>,
        json_client: Arc<dyn JsonClient>,
        event_deserializer: Arc<dyn EventDeserializer>,
        operation_queue: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            geocoder,
            url_provider,
            json_client,
            event_deserializer,
            operation_queue,
            runtime: Handle::current(),
        }
    }

    /// Spawns fetches on `runtime` instead of the one current at construction.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = runtime;
        self
    }

    /// Runs the geocode, search and deserialize pipeline without callbacks.
    #[instrument(target = "web_request", level = "info", skip(self))]
    pub async fn events_near_zip_code(
        &self,
        zip_code: &str,
        radius_miles: f32,
    ) -> Result<Vec<Event>, FetchError> {
        let placemarks = self.geocoder.geocode_address_string(zip_code).await?;

        let Some(placemark) = placemarks.into_iter().next() else {
            warn!(target: TARGET_GEOCODE, "No placemarks for '{}'", zip_code);
            return Err(GeocodeError::NoPlacemarks(zip_code.to_string()).into());
        };
        let location = placemark.location;
        debug!(target: TARGET_GEOCODE, "Resolved '{}' to {}, {}", zip_code, location.latitude, location.longitude);

        let url = self.url_provider.events_url();
        let query = events_query(location.latitude, location.longitude, radius_miles);

        let json = self.json_client.post_json(&url, &query).await?;
        let events = self.event_deserializer.deserialize_events(&json);

        info!(target: TARGET_WEB_REQUEST, "Found {} events within {} miles of {}", events.len(), radius_miles, zip_code);
        Ok(events)
    }
}

impl EventRepository for ConcreteEventRepository {
    fn fetch_events_with_zip_code(
        &self,
        zip_code: &str,
        radius_miles: f32,
        completion: EventsCompletion,
        error: ErrorCompletion,
    ) -> JoinHandle<()> {
        let repository = self.clone();
        let zip_code = zip_code.to_string();

        self.runtime.spawn(async move {
            match repository.events_near_zip_code(&zip_code, radius_miles).await {
                Ok(events) => repository
                    .operation_queue
                    .add_operation(Box::new(move || completion(events))),
                Err(FetchError::Geocoding(geocoding_error)) => {
                    error(FetchError::Geocoding(geocoding_error))
                }
                Err(transport_error) => repository
                    .operation_queue
                    .add_operation(Box::new(move || error(transport_error))),
            }
        })
    }
}

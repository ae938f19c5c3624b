//! Geocoder capability and its HTTP implementation.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{Coordinate, NominatimPlace, Placemark};
use crate::environment::Settings;
use crate::error::GeocodeError;
use crate::http::create_http_client;
use crate::TARGET_GEOCODE;

/// Resolves an address string, usually a zip code, into placemarks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode_address_string(&self, address: &str) -> Result<Vec<Placemark>, GeocodeError>;
}

/// Geocoder backed by a Nominatim-compatible search API.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: Url,
    country: String,
    request_timeout: Duration,
}

impl HttpGeocoder {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: create_http_client(&settings.user_agent)?,
            base_url: settings.geocoder_url.clone(),
            country: settings.geocoder_country.clone(),
            request_timeout: settings.request_timeout,
        })
    }

    fn search_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            if is_postal_code(address) {
                query.append_pair("postalcode", address.trim());
            } else {
                query.append_pair("q", address.trim());
            }
            query
                .append_pair("countrycodes", &self.country)
                .append_pair("format", "jsonv2");
        }

        Ok(url)
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode_address_string(&self, address: &str) -> Result<Vec<Placemark>, GeocodeError> {
        let url = self.search_url(address)?;
        info!(target: TARGET_GEOCODE, "Geocoding '{}'", address);

        let request = async {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| GeocodeError::Request(e.to_string()))?;

            if !response.status().is_success() {
                warn!(target: TARGET_GEOCODE, "Non-success status {} from {}", response.status(), url);
                return Err(GeocodeError::Status {
                    url: url.to_string(),
                    status: response.status().as_u16(),
                });
            }

            response
                .json::<Vec<NominatimPlace>>()
                .await
                .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
        };

        let places = timeout(self.request_timeout, request)
            .await
            .map_err(|_| GeocodeError::Timeout {
                url: url.to_string(),
                seconds: self.request_timeout.as_secs(),
            })??;
        debug!(target: TARGET_GEOCODE, "Geocoder returned {} places for '{}'", places.len(), address);

        places.into_iter().map(placemark_from_place).collect()
    }
}

fn placemark_from_place(place: NominatimPlace) -> Result<Placemark, GeocodeError> {
    let parse = |value: &str, field: &str| {
        value.trim().parse::<f64>().map_err(|_| {
            GeocodeError::InvalidResponse(format!("{} is not a number: {}", field, value))
        })
    };

    Ok(Placemark {
        name: place.display_name,
        location: Coordinate::new(parse(&place.lat, "lat")?, parse(&place.lon, "lon")?),
    })
}

/// US ZIP and ZIP+4 codes
fn is_postal_code(address: &str) -> bool {
    let address = address.trim();
    let (zip, plus_four) = match address.split_once('-') {
        Some((zip, plus_four)) => (zip, Some(plus_four)),
        None => (address, None),
    };

    zip.len() == 5
        && zip.chars().all(|c| c.is_ascii_digit())
        && plus_four.map_or(true, |p| p.len() == 4 && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn geocoder_for(server_url: &str) -> HttpGeocoder {
        let server_url = server_url.to_string();
        let settings = Settings::from_lookup(move |var| match var {
            "CANVASS_GEOCODER_URL" => Some(server_url.clone()),
            "CANVASS_REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        HttpGeocoder::new(&settings).unwrap()
    }

    #[test]
    fn test_is_postal_code() {
        assert!(is_postal_code("20001"));
        assert!(is_postal_code(" 20001-1234 "));
        assert!(!is_postal_code("2000"));
        assert!(!is_postal_code("20001-12"));
        assert!(!is_postal_code("Burlington, VT"));
    }

    #[tokio::test]
    async fn test_geocode_zip_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("postalcode".into(), "20001".into()),
                Matcher::UrlEncoded("countrycodes".into(), "us".into()),
                Matcher::UrlEncoded("format".into(), "jsonv2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"lat": "38.9", "lon": "-77.0", "display_name": "Washington, District of Columbia, 20001"}]"#,
            )
            .create_async()
            .await;

        let placemarks = geocoder_for(&server.url())
            .geocode_address_string("20001")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            placemarks,
            vec![Placemark {
                name: Some("Washington, District of Columbia, 20001".to_string()),
                location: Coordinate::new(38.9, -77.0),
            }]
        );
    }

    #[tokio::test]
    async fn test_geocode_free_text_uses_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "Burlington, VT".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let placemarks = geocoder_for(&server.url())
            .geocode_address_string("Burlington, VT")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(placemarks.is_empty());
    }

    #[tokio::test]
    async fn test_geocode_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = geocoder_for(&server.url())
            .geocode_address_string("20001")
            .await
            .unwrap_err();

        assert!(matches!(err, GeocodeError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_geocode_invalid_coordinates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lat": "north", "lon": "-77.0"}]"#)
            .create_async()
            .await;

        let err = geocoder_for(&server.url())
            .geocode_address_string("20001")
            .await
            .unwrap_err();

        assert!(matches!(err, GeocodeError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_geocode_timeout_covers_slow_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_chunked_body(|writer| {
                use std::io::Write;
                writer.write_all(b"[")?;
                std::thread::sleep(Duration::from_secs(2));
                writer.write_all(b"]")
            })
            .create_async()
            .await;

        let mut geocoder = geocoder_for(&server.url());
        geocoder.request_timeout = Duration::from_millis(200);

        let err = geocoder.geocode_address_string("20001").await.unwrap_err();

        assert!(matches!(err, GeocodeError::Timeout { .. }));
    }
}

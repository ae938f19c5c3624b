//! Error types surfaced by the fetch pipelines.

use thiserror::Error;

/// A zip code or address could not be resolved to a location.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("no placemarks found for '{0}'")]
    NoPlacemarks(String),

    #[error("geocoding request failed: {0}")]
    Request(String),

    #[error("geocoding request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    #[error("geocoder returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid geocoder response: {0}")]
    InvalidResponse(String),
}

/// The search request failed on the network or its payload was not JSON.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("response was not valid JSON: {0}")]
    InvalidJson(String),
}

/// Either stage of the event pipeline can fail; the inner error is passed through as is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error(transparent)]
    Geocoding(#[from] GeocodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_transparent() {
        let inner = GeocodeError::NoPlacemarks("00000".to_string());
        let err: FetchError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err, FetchError::Geocoding(inner));

        let inner = TransportError::Status {
            url: "http://localhost:9200/events/_search".to_string(),
            status: 503,
        };
        let err: FetchError = inner.clone().into();
        assert_eq!(
            err.to_string(),
            "HTTP 503 from http://localhost:9200/events/_search"
        );
        assert_eq!(err, FetchError::Transport(inner));
    }
}

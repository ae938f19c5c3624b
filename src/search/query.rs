//! Request bodies for the search backend.
//!
//! The backend speaks the Elasticsearch query DSL. Date math such as `now+6M/d`
//! is evaluated by the backend at query time, never on the client.

use serde_json::{json, Value};

/// Lower bound of the event start-time window.
pub const START_TIME_LOWER_BOUND: &str = "now";
/// Upper bound of the event start-time window: six months out, rounded to the day.
pub const START_TIME_UPPER_BOUND: &str = "now+6M/d";

/// Query for events within `radius_miles` of a point that start within the next six months.
///
/// The `must` list always holds the geo-distance clause first and the
/// start-time range clause second.
pub fn events_query(latitude: f64, longitude: f64, radius_miles: f32) -> Value {
    let filter_conditions = vec![
        geo_distance_clause(latitude, longitude, radius_miles),
        start_time_range_clause(),
    ];

    json!({
        "query": {
            "filtered": {
                "query": {
                    "match_all": {}
                },
                "filter": {
                    "bool": {
                        "must": filter_conditions
                    }
                }
            }
        }
    })
}

pub fn geo_distance_clause(latitude: f64, longitude: f64, radius_miles: f32) -> Value {
    json!({
        "geo_distance": {
            "distance": format_distance_miles(radius_miles),
            "location": {
                "lat": latitude,
                "lon": longitude
            }
        }
    })
}

pub fn start_time_range_clause() -> Value {
    json!({
        "range": {
            "start_time": {
                "gte": START_TIME_LOWER_BOUND,
                "lte": START_TIME_UPPER_BOUND
            }
        }
    })
}

/// Formats a radius as a distance string, always with a fractional part (`10.0mi`).
///
/// Radii at or above 1e16 or below 1e-4 come out in exponent form (`1e16mi`,
/// `1e-5mi`), which the search backend still parses as a plain number.
pub fn format_distance_miles(radius_miles: f32) -> String {
    // Debug keeps the ".0" that Display drops for whole numbers
    format!("{:?}mi", radius_miles)
}

/// Newest-first page of news articles.
pub fn news_query(size: usize) -> Value {
    json!({
        "from": 0,
        "size": size,
        "query": {
            "match_all": {}
        },
        "sort": [
            {"created_at": {"order": "desc"}}
        ]
    })
}

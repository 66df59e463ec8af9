//! Request-scoped data passed between the adapters and the result page

use serde::{Deserialize, Serialize};

/// A point on Earth produced by geocoding, threaded unchanged into every
/// downstream call. Lives for one request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as the `lat,lon` pair the upstream APIs expect
    #[must_use]
    pub fn as_pair(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Everything the result page renders for one address
#[derive(Debug, Clone, Serialize)]
pub struct PlaceReport {
    /// Title-cased address as shown in the page heading
    pub address: String,
    /// Resolved coordinate
    pub coordinate: Coordinate,
    /// Human-readable weather summary line
    pub weather: String,
    /// Raw photo-search response body, passed through unvalidated
    pub photos: serde_json::Value,
    /// Cache-busted URL of the static map image
    pub static_map_url: String,
    /// Cache-busted URL of the street-view image
    pub street_view_url: String,
}

/// Uppercase the first letter of each whitespace-separated word and
/// lowercase the rest.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

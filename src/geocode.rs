//! Geocoder adapter
//!
//! Resolves a free-text street address into a [`Coordinate`]. A provider
//! answer with no coordinate is a distinct not-found failure so the handler
//! can answer 404 instead of crashing further down the pipeline.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::ProviderConfig;
use crate::error::{PlacecardError, Provider};
use crate::models::Coordinate;

/// Client for the geocoding endpoint
pub struct GeocoderClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocoderClient {
    /// Create a new client
    #[must_use]
    pub fn new(http: Client, providers: &ProviderConfig) -> Self {
        Self {
            http,
            base_url: providers.geocoding_base_url.clone(),
            api_key: providers.geocoding_api_key.clone(),
        }
    }

    /// Resolve an address into a coordinate
    pub async fn resolve(&self, address: &str) -> Result<Coordinate> {
        debug!("Geocoding address: '{}'", address);
        let url = self.request_url(address);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PlacecardError::upstream(Provider::Geocoding, e.to_string()))?;

        if !response.status().is_success() {
            return Err(PlacecardError::upstream(
                Provider::Geocoding,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| PlacecardError::malformed(Provider::Geocoding, e.to_string()))?;

        coordinate_from_response(address, body)
    }

    fn request_url(&self, address: &str) -> String {
        let mut url = format!(
            "{}/json?address={}",
            self.base_url,
            urlencoding::encode(address)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(key);
        }
        url
    }
}

fn coordinate_from_response(address: &str, response: GeocodeResponse) -> Result<Coordinate> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => {
            warn!("No geocoding results for '{}'", address);
            return Err(PlacecardError::address_not_found(address));
        }
        other => {
            return Err(PlacecardError::upstream(
                Provider::Geocoding,
                format!("status {other}"),
            ));
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| PlacecardError::address_not_found(address))?;

    let coordinate = Coordinate::new(first.geometry.location.lat, first.geometry.location.lng);
    info!(
        "Resolved '{}' to ({:.4}, {:.4})",
        address, coordinate.latitude, coordinate.longitude
    );
    Ok(coordinate)
}

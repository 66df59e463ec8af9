//! Photo-search adapter
//!
//! The response body is decoded JSON handed to the result page unmodified;
//! the page decides how to show it. No pagination, no filtering.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::config::ProviderConfig;
use crate::error::{PlacecardError, Provider};
use crate::models::Coordinate;

/// Client for the photo-search endpoint
pub struct PhotoClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl PhotoClient {
    /// Create a new client
    #[must_use]
    pub fn new(http: Client, providers: &ProviderConfig) -> Self {
        Self {
            http,
            base_url: providers.photos_base_url.clone(),
            access_token: providers.photos_access_token.clone(),
        }
    }

    /// Search for photos near a coordinate and return the raw response body
    pub async fn search(&self, coordinate: Coordinate) -> Result<Value> {
        let url = self.request_url(&coordinate);
        debug!(
            "Searching photos near ({}, {})",
            coordinate.latitude, coordinate.longitude
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PlacecardError::upstream(Provider::Photos, e.to_string()))?;

        if !response.status().is_success() {
            return Err(PlacecardError::upstream(
                Provider::Photos,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| PlacecardError::malformed(Provider::Photos, e.to_string()))
    }

    fn request_url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}/media/search?lat={}&lng={}&access_token={}",
            self.base_url, coordinate.latitude, coordinate.longitude, self.access_token
        )
    }
}

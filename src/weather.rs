//! Forecast adapter
//!
//! One call to the forecast endpoint per request, reduced to the single
//! human-readable summary line the result page shows: the current
//! temperature plus today's forecast text.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::Result;
use crate::config::{ProviderConfig, Units};
use crate::error::{PlacecardError, Provider};
use crate::models::Coordinate;

/// Client for the forecast endpoint
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

/// Forecast response, reduced to the fields the summary needs
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    currently: Currently,
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Currently {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct Daily {
    #[serde(default)]
    data: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    summary: String,
}

impl WeatherClient {
    /// Create a new client
    #[must_use]
    pub fn new(http: Client, providers: &ProviderConfig, units: Units) -> Self {
        Self {
            http,
            base_url: providers.forecast_base_url.clone(),
            api_key: providers.weather_api_key.clone(),
            units,
        }
    }

    /// Fetch the forecast for a coordinate and reduce it to one summary line
    pub async fn summarize(&self, coordinate: Coordinate) -> Result<String> {
        let url = self.request_url(&coordinate);
        debug!(
            "Fetching forecast for ({}, {})",
            coordinate.latitude, coordinate.longitude
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PlacecardError::upstream(Provider::Forecast, e.to_string()))?;

        if !response.status().is_success() {
            return Err(PlacecardError::upstream(
                Provider::Forecast,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| PlacecardError::malformed(Provider::Forecast, e.to_string()))?;

        summary_line(&body, self.units)
    }

    fn request_url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}/forecast/{}/{}?units={}",
            self.base_url,
            self.api_key,
            coordinate.as_pair(),
            self.units.flag()
        )
    }
}

/// The first daily entry stands for today; a response without one does not
/// describe any day this page could show.
fn summary_line(response: &ForecastResponse, units: Units) -> Result<String> {
    let today = response.daily.data.first().ok_or_else(|| {
        PlacecardError::malformed(Provider::Forecast, "daily forecast list is empty")
    })?;

    Ok(format!(
        "Temperature: {} {}. Forecast: {}",
        response.currently.temperature,
        units.temperature_label(),
        today.summary
    ))
}

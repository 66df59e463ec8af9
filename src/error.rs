//! Error types and handling for the `Placecard` service

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::pages;

/// Upstream providers this service calls on behalf of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Address-to-coordinate resolution
    Geocoding,
    /// Daily forecast and current temperature
    Forecast,
    /// Location-scoped photo search
    Photos,
    /// Static map image endpoint
    StaticMap,
    /// Street-view image endpoint
    StreetView,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Provider::Geocoding => "geocoder",
            Provider::Forecast => "forecast provider",
            Provider::Photos => "photo search",
            Provider::StaticMap => "static map provider",
            Provider::StreetView => "street view provider",
        };
        write!(f, "{name}")
    }
}

/// Main error type for the `Placecard` service
#[derive(Error, Debug)]
pub enum PlacecardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The geocoder resolved no coordinate for the given address
    #[error("No coordinate found for address '{address}'")]
    AddressNotFound { address: String },

    /// An upstream provider was unreachable or answered with an error status
    #[error("{provider} request failed: {message}")]
    Upstream { provider: Provider, message: String },

    /// An upstream provider answered with a body this service cannot decode
    #[error("{provider} returned a malformed response: {message}")]
    MalformedResponse { provider: Provider, message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlacecardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new address-not-found error
    pub fn address_not_found<S: Into<String>>(address: S) -> Self {
        Self::AddressNotFound {
            address: address.into(),
        }
    }

    /// Create a new upstream error for the named provider
    pub fn upstream<S: Into<String>>(provider: Provider, message: S) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    /// Create a new malformed-response error for the named provider
    pub fn malformed<S: Into<String>>(provider: Provider, message: S) -> Self {
        Self::MalformedResponse {
            provider,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlacecardError::AddressNotFound { .. } => StatusCode::NOT_FOUND,
            PlacecardError::Upstream { .. } | PlacecardError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            PlacecardError::Config { .. } | PlacecardError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlacecardError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            PlacecardError::AddressNotFound { address } => {
                format!("No results for '{address}'. Try a different address.")
            }
            PlacecardError::Upstream { provider, .. } => {
                format!("The {provider} is unavailable right now. Please try again later.")
            }
            PlacecardError::MalformedResponse { provider, .. } => {
                format!("The {provider} returned data this service could not read.")
            }
            PlacecardError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl IntoResponse for PlacecardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request failed: {}", self);
        }
        (status, Html(pages::error_page(status, &self.user_message()))).into_response()
    }
}

//! `Placecard` - describe a street address with weather, photos, and map imagery
//!
//! This library wires four upstream HTTP adapters (geocoding, forecast,
//! photo search, map imagery) into one web handler that renders a result
//! page per address.

pub mod config;
pub mod error;
pub mod geocode;
pub mod imagery;
pub mod models;
pub mod pages;
pub mod photos;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::{PlacecardConfig, Units};
pub use error::{PlacecardError, Provider};
pub use geocode::GeocoderClient;
pub use imagery::{ImageStore, ImageryClient};
pub use models::{Coordinate, PlaceReport};
pub use photos::PhotoClient;
pub use weather::WeatherClient;
pub use web::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlacecardError>;

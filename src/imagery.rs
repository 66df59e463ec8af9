//! Map-image adapters (static map and street view)
//!
//! Both endpoints return raw image bytes. Each download is written into its
//! own directory under the static root, keyed by coordinate and a
//! millisecond timestamp, so concurrent requests never touch each other's
//! files. The file names inside a directory stay fixed (`map.jpg`,
//! `street.jpg`); the `v` query token on the returned URL forces browsers
//! to re-fetch instead of reusing a cached image.

use chrono::Utc;
use reqwest::Client;
use std::path::PathBuf;
use tracing::debug;

use crate::Result;
use crate::config::ProviderConfig;
use crate::error::{PlacecardError, Provider};
use crate::models::Coordinate;

/// File name of the stored static map image
pub const STATIC_MAP_FILE: &str = "map.jpg";
/// File name of the stored street-view image
pub const STREET_VIEW_FILE: &str = "street.jpg";

/// Writes downloaded images under a root directory, one subdirectory per
/// download
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory key tying stored files to one download of one coordinate
    fn request_key(coordinate: &Coordinate, stamp_millis: i64) -> String {
        format!(
            "{:.4}_{:.4}_{stamp_millis}",
            coordinate.latitude, coordinate.longitude
        )
    }

    async fn save(&self, key: &str, file_name: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.root.join(key);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(file_name), bytes).await?;
        Ok(())
    }
}

/// Client for the two map-image endpoints
pub struct ImageryClient {
    http: Client,
    store: ImageStore,
    static_map_base_url: String,
    street_view_base_url: String,
    static_map_api_key: String,
    street_view_api_key: String,
}

impl ImageryClient {
    /// Create a new client
    #[must_use]
    pub fn new(http: Client, providers: &ProviderConfig, store: ImageStore) -> Self {
        Self {
            http,
            store,
            static_map_base_url: providers.static_map_base_url.clone(),
            street_view_base_url: providers.street_view_base_url.clone(),
            static_map_api_key: providers.static_map_api_key.clone(),
            street_view_api_key: providers.street_view_api_key.clone(),
        }
    }

    /// Download the static map image for a coordinate and return its
    /// cache-busted URL
    pub async fn fetch_static_map(&self, coordinate: Coordinate) -> Result<String> {
        let url = format!(
            "{}/staticmap?center={}&zoom=13&size=600x300&maptype=hybrid&key={}",
            self.static_map_base_url,
            coordinate.as_pair(),
            self.static_map_api_key
        );
        self.fetch(url, Provider::StaticMap, &coordinate, STATIC_MAP_FILE)
            .await
    }

    /// Download the street-view image for a coordinate and return its
    /// cache-busted URL
    pub async fn fetch_street_view(&self, coordinate: Coordinate) -> Result<String> {
        let url = format!(
            "{}/streetview?size=400x400&location={}&fov=90&heading=235&pitch=10&key={}",
            self.street_view_base_url,
            coordinate.as_pair(),
            self.street_view_api_key
        );
        self.fetch(url, Provider::StreetView, &coordinate, STREET_VIEW_FILE)
            .await
    }

    /// Shared download-and-store routine; the two adapters differ only in
    /// endpoint URL and file name.
    async fn fetch(
        &self,
        url: String,
        provider: Provider,
        coordinate: &Coordinate,
        file_name: &str,
    ) -> Result<String> {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PlacecardError::upstream(provider, e.to_string()))?;

        if !response.status().is_success() {
            return Err(PlacecardError::upstream(
                provider,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlacecardError::upstream(provider, e.to_string()))?;

        let stamp = Utc::now().timestamp_millis();
        let key = ImageStore::request_key(coordinate, stamp);
        self.store.save(&key, file_name, &bytes).await?;
        debug!("Stored {} bytes at {}/{}", bytes.len(), key, file_name);

        Ok(image_url(&key, file_name, stamp))
    }
}

fn image_url(key: &str, file_name: &str, stamp_millis: i64) -> String {
    format!("/static/{key}/{file_name}?v={stamp_millis}")
}

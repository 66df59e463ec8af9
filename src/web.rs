//! HTTP surface: router, shared state, and the describe handler

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::response::Html;
use axum::routing::get;
use axum::{Router, extract::Path as UrlPath, extract::State};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::Result;
use crate::config::PlacecardConfig;
use crate::geocode::GeocoderClient;
use crate::imagery::{ImageStore, ImageryClient};
use crate::models::{PlaceReport, title_case};
use crate::pages;
use crate::photos::PhotoClient;
use crate::weather::WeatherClient;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared adapter clients, built once at startup
pub struct AppState {
    geocoder: GeocoderClient,
    weather: WeatherClient,
    photos: PhotoClient,
    imagery: ImageryClient,
}

impl AppState {
    /// Build the adapter clients from loaded configuration
    pub fn new(config: &PlacecardConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(concat!("placecard/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            geocoder: GeocoderClient::new(http.clone(), &config.providers),
            weather: WeatherClient::new(http.clone(), &config.providers, config.units),
            photos: PhotoClient::new(http.clone(), &config.providers),
            imagery: ImageryClient::new(
                http,
                &config.providers,
                ImageStore::new(&config.server.image_dir),
            ),
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, image_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/describe/{address}", get(describe))
        .nest_service("/static", ServeDir::new(image_dir))
        .layer(cors)
        .with_state(state)
}

/// Bind the listener and serve until shutdown
pub async fn run(config: PlacecardConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.server.image_dir).with_context(|| {
        format!(
            "Failed to create image directory: {}",
            config.server.image_dir.display()
        )
    })?;

    let state = Arc::new(AppState::new(&config)?);
    let app = router(state, &config.server.image_dir);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .await
        .with_context(|| "Server error")?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn describe(
    State(state): State<Arc<AppState>>,
    UrlPath(address): UrlPath<String>,
) -> Result<Html<String>> {
    let report = describe_address(&state, &address).await?;
    Ok(Html(pages::place_page(&report)))
}

/// One address in, one fully assembled report out. The four downstream
/// fetches share nothing beyond the coordinate, so they run concurrently
/// once resolution succeeds; any failure fails the whole request.
async fn describe_address(state: &AppState, address: &str) -> Result<PlaceReport> {
    info!("Describing address '{}'", address);
    let coordinate = state.geocoder.resolve(address).await?;

    let (weather, photos, static_map_url, street_view_url) = tokio::try_join!(
        state.weather.summarize(coordinate),
        state.photos.search(coordinate),
        state.imagery.fetch_static_map(coordinate),
        state.imagery.fetch_street_view(coordinate),
    )?;

    Ok(PlaceReport {
        address: title_case(address),
        coordinate,
        weather,
        photos,
        static_map_url,
        street_view_url,
    })
}

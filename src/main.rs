use std::path::PathBuf;

use anyhow::Result;
use placecard::config::{DEFAULT_CONFIG_FILE, PlacecardConfig};
use placecard::web;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
    let config = PlacecardConfig::load(&config_path)?;
    tracing::info!("Loaded configuration from {}", config_path.display());

    web::run(config).await
}

//! Configuration management for the `Placecard` service
//!
//! Secrets and settings come from a flat `KEY=VALUE` file read once at
//! startup, with `PLACECARD_`-prefixed environment variables taking
//! precedence. The loaded struct is passed into each adapter; there is no
//! ambient global configuration state.

use crate::error::PlacecardError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "placecard.env";

const ENV_PREFIX: &str = "PLACECARD_";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_IMAGE_DIR: &str = "static";
const DEFAULT_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";
const DEFAULT_FORECAST_BASE_URL: &str = "https://api.forecast.io";
const DEFAULT_PHOTOS_BASE_URL: &str = "https://api.instagram.com/v1";
const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Measurement system requested from the forecast provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    /// Metric, temperatures in Celsius
    Si,
    /// US customary, temperatures in Fahrenheit
    Us,
}

impl Units {
    /// Query-parameter flag the forecast endpoint expects
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            Units::Si => "si",
            Units::Us => "us",
        }
    }

    /// Unit name as written into the weather summary line
    #[must_use]
    pub fn temperature_label(&self) -> &'static str {
        match self {
            Units::Si => "Celsius",
            Units::Us => "Fahrenheit",
        }
    }

    fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "si" => Ok(Units::Si),
            "us" => Ok(Units::Us),
            other => Err(PlacecardError::config(format!(
                "Invalid UNITS value '{other}'. Must be one of: si, us"
            ))
            .into()),
        }
    }
}

/// HTTP listener and image storage settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the listener binds on
    pub port: u16,
    /// Directory request-keyed image files are written under; served at `/static`
    pub image_dir: PathBuf,
}

/// Credentials and endpoints for the upstream providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Forecast API key
    pub weather_api_key: String,
    /// Photo-search access token
    pub photos_access_token: String,
    /// Static map API key
    pub static_map_api_key: String,
    /// Street-view API key
    pub street_view_api_key: String,
    /// Geocoding API key; appended to the request when present
    pub geocoding_api_key: Option<String>,
    /// Base URL of the geocoding endpoint
    pub geocoding_base_url: String,
    /// Base URL of the forecast endpoint
    pub forecast_base_url: String,
    /// Base URL of the photo-search endpoint
    pub photos_base_url: String,
    /// Base URL of the static map endpoint
    pub static_map_base_url: String,
    /// Base URL of the street-view endpoint
    pub street_view_base_url: String,
}

/// Root configuration for the `Placecard` service
#[derive(Debug, Clone)]
pub struct PlacecardConfig {
    /// Listener and storage settings
    pub server: ServerConfig,
    /// Upstream provider settings
    pub providers: ProviderConfig,
    /// Measurement system for the weather summary
    pub units: Units,
}

impl PlacecardConfig {
    /// Load configuration from the given `KEY=VALUE` file and the
    /// environment. Fails if the file is missing or malformed; the process
    /// should not start without it.
    pub fn load(path: &Path) -> Result<Self> {
        let mut values = parse_key_value_file(path)?;
        apply_env_overrides(&mut values);
        Self::from_values(&values)
    }

    fn from_values(values: &HashMap<String, String>) -> Result<Self> {
        let port = match values.get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let units = match values.get("UNITS") {
            Some(raw) => Units::parse(raw)?,
            None => Units::Us,
        };

        let image_dir = values
            .get("IMAGE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR), PathBuf::from);

        let base_url = |key: &str, default: &str| {
            values
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            server: ServerConfig { port, image_dir },
            providers: ProviderConfig {
                weather_api_key: require(values, "WEATHER_API_KEY")?,
                photos_access_token: require(values, "PHOTOS_ACCESS_TOKEN")?,
                static_map_api_key: require(values, "STATIC_MAP_API_KEY")?,
                street_view_api_key: require(values, "STREET_VIEW_API_KEY")?,
                geocoding_api_key: values.get("GEOCODING_API_KEY").cloned(),
                geocoding_base_url: base_url("GEOCODING_BASE_URL", DEFAULT_GEOCODING_BASE_URL),
                forecast_base_url: base_url("FORECAST_BASE_URL", DEFAULT_FORECAST_BASE_URL),
                photos_base_url: base_url("PHOTOS_BASE_URL", DEFAULT_PHOTOS_BASE_URL),
                static_map_base_url: base_url("STATIC_MAP_BASE_URL", DEFAULT_MAPS_BASE_URL),
                street_view_base_url: base_url("STREET_VIEW_BASE_URL", DEFAULT_MAPS_BASE_URL),
            },
            units,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_server()?;
        self.validate_base_urls()?;
        Ok(())
    }

    /// Validate API keys and credentials
    fn validate_api_keys(&self) -> Result<()> {
        let required = [
            ("WEATHER_API_KEY", &self.providers.weather_api_key),
            ("PHOTOS_ACCESS_TOKEN", &self.providers.photos_access_token),
            ("STATIC_MAP_API_KEY", &self.providers.static_map_api_key),
            ("STREET_VIEW_API_KEY", &self.providers.street_view_api_key),
        ];

        for (name, key) in required {
            if key.len() < 8 {
                return Err(PlacecardError::config(format!(
                    "{name} appears to be invalid (too short). Please check your API key."
                ))
                .into());
            }
            if key.len() > 100 {
                return Err(PlacecardError::config(format!(
                    "{name} appears to be invalid (too long). Please check your API key."
                ))
                .into());
            }
        }

        if let Some(key) = &self.providers.geocoding_api_key {
            if key.is_empty() {
                return Err(PlacecardError::config(
                    "GEOCODING_API_KEY cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PlacecardError::config("PORT cannot be 0").into());
        }
        Ok(())
    }

    fn validate_base_urls(&self) -> Result<()> {
        let urls = [
            &self.providers.geocoding_base_url,
            &self.providers.forecast_base_url,
            &self.providers.photos_base_url,
            &self.providers.static_map_base_url,
            &self.providers.street_view_base_url,
        ];

        for url in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlacecardError::config(format!(
                    "Provider base URL must be a valid HTTP or HTTPS URL, got: {url}"
                ))
                .into());
            }
        }

        Ok(())
    }
}

fn parse_key_value_file(path: &Path) -> Result<HashMap<String, String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut values = HashMap::new();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(PlacecardError::config(format!(
                "Malformed line {} in {}: expected KEY=VALUE",
                number + 1,
                path.display()
            ))
            .into());
        };
        values.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(values)
}

fn apply_env_overrides(values: &mut HashMap<String, String>) {
    for (key, value) in std::env::vars() {
        if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
            values.insert(stripped.to_string(), value);
        }
    }
}

fn require(values: &HashMap<String, String>, key: &str) -> Result<String> {
    match values.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        Some(_) => Err(PlacecardError::config(format!("Config key {key} cannot be empty")).into()),
        None => Err(PlacecardError::config(format!("Missing required config key: {key}")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir().join(format!("placecard-{name}-{stamp}.env"));
        fs::write(&path, contents).unwrap();
        path
    }

    fn required_keys() -> String {
        [
            "WEATHER_API_KEY=weather_key_0000",
            "PHOTOS_ACCESS_TOKEN=photos_token_0000",
            "STATIC_MAP_API_KEY=static_map_key_0000",
            "STREET_VIEW_API_KEY=street_view_key_0000",
        ]
        .join("\n")
    }

    #[test]
    fn test_load_full_file() {
        let contents = format!(
            "# secrets\n\n{}\nPORT=9090\nUNITS=si\nIMAGE_DIR=images\n",
            required_keys()
        );
        let path = write_config("full", &contents);

        let config = PlacecardConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.image_dir, PathBuf::from("images"));
        assert_eq!(config.units, Units::Si);
        assert_eq!(config.providers.weather_api_key, "weather_key_0000");
        assert_eq!(
            config.providers.forecast_base_url,
            "https://api.forecast.io"
        );
        assert!(config.providers.geocoding_api_key.is_none());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_defaults_applied() {
        let path = write_config("defaults", &required_keys());

        let config = PlacecardConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.image_dir, PathBuf::from("static"));
        assert_eq!(config.units, Units::Us);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_fails() {
        let path = env::temp_dir().join("placecard-does-not-exist.env");
        let result = PlacecardConfig::load(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_line_fails() {
        let contents = format!("{}\nnot a key value pair\n", required_keys());
        let path = write_config("malformed", &contents);

        let result = PlacecardConfig::load(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Malformed line"));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_required_key_fails() {
        let path = write_config("missing-key", "WEATHER_API_KEY=weather_key_0000\n");

        let result = PlacecardConfig::load(&path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Missing required config key")
        );

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_invalid_units_fails() {
        let contents = format!("{}\nUNITS=imperial\n", required_keys());
        let path = write_config("units", &contents);

        let result = PlacecardConfig::load(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid UNITS"));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_short_api_key_fails() {
        let contents = format!("{}\n", required_keys()).replace(
            "WEATHER_API_KEY=weather_key_0000",
            "WEATHER_API_KEY=short",
        );
        let path = write_config("short-key", &contents);

        let result = PlacecardConfig::load(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_environment_variable_override() {
        // SAFETY: Test environment, setting a test-only value
        unsafe {
            env::set_var("PLACECARD_TEST_ONLY_KEY", "from_env");
        }

        let mut values = HashMap::new();
        values.insert("TEST_ONLY_KEY".to_string(), "from_file".to_string());
        apply_env_overrides(&mut values);

        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("PLACECARD_TEST_ONLY_KEY");
        }

        assert_eq!(values.get("TEST_ONLY_KEY").map(String::as_str), Some("from_env"));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let contents = format!("# header\n\n   \n{}\n# trailing\n", required_keys());
        let path = write_config("comments", &contents);

        assert!(PlacecardConfig::load(&path).is_ok());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_base_url_validation() {
        let mut values = HashMap::new();
        for line in required_keys().lines() {
            let (key, value) = line.split_once('=').unwrap();
            values.insert(key.to_string(), value.to_string());
        }
        values.insert("FORECAST_BASE_URL".to_string(), "ftp://example".to_string());

        let result = PlacecardConfig::from_values(&values);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("valid HTTP or HTTPS URL")
        );
    }
}

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is read first when present, so local runs can keep their
//! settings next to the data directory.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::db::DEFAULT_WORKOUTS_KEY;
use crate::models::Location;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Directory holding persisted workouts
    pub data_dir: PathBuf,
    /// Storage key for the serialized workout list
    pub storage_key: String,
    /// Zoom level used when centering the map
    pub map_zoom: u8,
    /// Delay before the hidden form's layout is restored
    pub form_restore_delay: Duration,
    /// Map center used when the user's position is unavailable
    pub fallback_location: Location,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: PathBuf::from("data"),
            storage_key: DEFAULT_WORKOUTS_KEY.to_string(),
            map_zoom: 13,
            form_restore_delay: Duration::from_millis(1000),
            fallback_location: Location::ORIGIN,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let fallback_lat = parse_var("FALLBACK_LAT", defaults.fallback_location.lat())?;
        let fallback_lng = parse_var("FALLBACK_LNG", defaults.fallback_location.lng())?;
        let fallback_location = Location::new(fallback_lat, fallback_lng)
            .map_err(|e| ConfigError::Invalid("FALLBACK_LAT/FALLBACK_LNG", e.to_string()))?;

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: env::var("STORAGE_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.storage_key),
            map_zoom: parse_var("MAP_ZOOM", defaults.map_zoom)?,
            form_restore_delay: Duration::from_millis(parse_var(
                "FORM_RESTORE_DELAY_MS",
                defaults.form_restore_delay.as_millis() as u64,
            )?),
            fallback_location,
        })
    }
}

/// Parse an optional environment variable, using `default` when unset.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(name, e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("MAP_ZOOM", "15");
        env::set_var("FORM_RESTORE_DELAY_MS", "250");
        env::set_var("FALLBACK_LAT", "40.7");
        env::set_var("FALLBACK_LNG", "-74.0");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.map_zoom, 15);
        assert_eq!(config.form_restore_delay, Duration::from_millis(250));
        assert_eq!(config.fallback_location.lat(), 40.7);

        env::set_var("MAP_ZOOM", "very close");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("MAP_ZOOM", _))
        ));

        env::remove_var("MAP_ZOOM");
        env::remove_var("FORM_RESTORE_DELAY_MS");
        env::remove_var("FALLBACK_LAT");
        env::remove_var("FALLBACK_LNG");
    }
}

// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! The tile-service API key is a secret: it is read once at startup, kept in
//! memory, and redacted from `Debug` output so it can never leak into logs.

use std::env;
use std::fmt;

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// Geocoding endpoint (GET {geocoder_url}?q={address})
    pub geocoder_url: String,
    /// Tile URL template with {z}, {x} and {y} placeholders
    pub tile_url_template: String,
    /// API key for the tile service (secret)
    pub tile_api_key: String,
    /// Directory holding the marker icon and the two fonts
    pub assets_dir: String,
    /// Server port
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("geocoder_url", &self.geocoder_url)
            .field("tile_url_template", &self.tile_url_template)
            .field("tile_api_key", &"<redacted>")
            .field("assets_dir", &self.assets_dir)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only `STADIA_API_KEY` is required; everything else has a default
    /// matching the public Stadia/Stamen + BAN endpoints.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| "https://api-adresse.data.gouv.fr/search/".to_string()),
            tile_url_template: env::var("TILE_URL_TEMPLATE").unwrap_or_else(|_| {
                "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}.png".to_string()
            }),
            tile_api_key: env::var("STADIA_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STADIA_API_KEY"))?,
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            geocoder_url: "http://127.0.0.1:0/search/".to_string(),
            tile_url_template: "http://127.0.0.1:0/tiles/{z}/{x}/{y}.png".to_string(),
            tile_api_key: "test_api_key".to_string(),
            assets_dir: "assets".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

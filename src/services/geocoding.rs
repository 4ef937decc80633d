// SPDX-License-Identifier: MIT

//! Geocoding client resolving free-text addresses to coordinates.
//!
//! Talks to a BAN-style endpoint (`GET {base_url}?q={address}`) returning a
//! GeoJSON `FeatureCollection`. Only the first candidate is used; there is
//! no ranking or disambiguation of our own.

use crate::models::Coordinates;
use reqwest::StatusCode;

/// Geocoding API client.
#[derive(Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodingClient {
    /// Create a client against `base_url`.
    ///
    /// Tests point this at an in-process stub server.
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Resolve `address` to the coordinates of its best match.
    pub async fn locate(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let query = address.trim();
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(GeocodeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let body = response.text().await.map_err(GeocodeError::Transport)?;
        first_candidate(&body, query)
    }
}

/// Extract the first feature's Point coordinates from a GeoJSON body.
pub fn first_candidate(body: &str, query: &str) -> Result<Coordinates, GeocodeError> {
    let collection: geojson::FeatureCollection =
        serde_json::from_str(body).map_err(|_| GeocodeError::Malformed)?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch {
            query: query.to_string(),
        })?;

    let geometry = feature.geometry.ok_or(GeocodeError::Malformed)?;
    match geometry.value {
        geojson::Value::Point(position) if position.len() >= 2 => Ok(Coordinates {
            longitude: position[0],
            latitude: position[1],
        }),
        _ => Err(GeocodeError::Malformed),
    }
}

/// Geocoding errors. An empty candidate list is a named variant, never an
/// out-of-bounds access.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("geocoder returned HTTP {0}")]
    Status(StatusCode),

    #[error("geocoder returned an unparseable response")]
    Malformed,

    #[error("no result for \"{query}\"")]
    NoMatch { query: String },
}

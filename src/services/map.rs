// SPDX-License-Identifier: MIT

//! Map rendering by fetching and compositing slippy tiles.
//!
//! Produces a square frame centered on a coordinate at a fixed zoom, with
//! the marker icon blended over the pinpoint. Tiles are fetched one at a
//! time; any tile failure aborts the whole render so a partial map can
//! never reach the poster.

use crate::models::Coordinates;
use image::{Rgb, RgbImage, RgbaImage};
use reqwest::StatusCode;
use std::f64::consts::PI;

/// Width and height of the rendered map frame, in pixels.
pub const MAP_FRAME_SIZE: u32 = 3200;
/// Fixed zoom level for the poster map.
pub const MAP_ZOOM: u32 = 17;

const TILE_SIZE: u32 = 256;

/// Tile-service client and compositor.
#[derive(Clone)]
pub struct MapRenderer {
    http: reqwest::Client,
    tile_url_template: String,
    api_key: String,
}

impl MapRenderer {
    /// Create a renderer for a `{z}/{x}/{y}` URL template.
    ///
    /// The API key is appended as an `api_key` query parameter and must not
    /// appear in any error or log line.
    pub fn new(http: reqwest::Client, tile_url_template: String, api_key: String) -> Self {
        Self {
            http,
            tile_url_template,
            api_key,
        }
    }

    /// Render the frame centered on `center`, with `marker_icon` on top.
    pub async fn render(
        &self,
        center: Coordinates,
        marker_icon: &RgbaImage,
    ) -> Result<RgbImage, MapError> {
        let (center_x, center_y) = global_pixel(center, MAP_ZOOM);
        let half = (MAP_FRAME_SIZE / 2) as f64;
        let left = (center_x - half).round() as i64;
        let top = (center_y - half).round() as i64;

        let tile_count = 1i64 << MAP_ZOOM;
        let tile_size = TILE_SIZE as i64;
        let tile_min_x = left.div_euclid(tile_size);
        let tile_max_x = (left + MAP_FRAME_SIZE as i64 - 1).div_euclid(tile_size);
        let tile_min_y = top.div_euclid(tile_size);
        let tile_max_y = (top + MAP_FRAME_SIZE as i64 - 1).div_euclid(tile_size);

        // Out-of-range rows (beyond the poles) stay white
        let mut frame =
            RgbImage::from_pixel(MAP_FRAME_SIZE, MAP_FRAME_SIZE, Rgb([255, 255, 255]));

        for tile_y in tile_min_y..=tile_max_y {
            if tile_y < 0 || tile_y >= tile_count {
                continue;
            }
            for tile_x in tile_min_x..=tile_max_x {
                let wrapped_x = tile_x.rem_euclid(tile_count);
                let bytes = self
                    .fetch_tile(MAP_ZOOM, wrapped_x as u32, tile_y as u32)
                    .await?;
                let tile = image::load_from_memory(&bytes)
                    .map_err(|source| MapError::TileDecode {
                        z: MAP_ZOOM,
                        x: wrapped_x as u32,
                        y: tile_y as u32,
                        source,
                    })?
                    .to_rgb8();
                image::imageops::replace(
                    &mut frame,
                    &tile,
                    tile_x * tile_size - left,
                    tile_y * tile_size - top,
                );
            }
        }

        overlay_marker(&mut frame, marker_icon);
        Ok(frame)
    }

    async fn fetch_tile(&self, z: u32, x: u32, y: u32) -> Result<Vec<u8>, MapError> {
        let url = self.tile_url(z, x, y);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MapError::Transport(e.without_url()))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(MapError::Forbidden { z, x, y });
        }
        if !status.is_success() {
            return Err(MapError::TileStatus { z, x, y, status });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| MapError::Transport(e.without_url()))
    }

    fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        let base = self
            .tile_url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string());
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}api_key={}", base, separator, self.api_key)
    }
}

/// Web-Mercator position of a coordinate in global pixels at `zoom`.
fn global_pixel(center: Coordinates, zoom: u32) -> (f64, f64) {
    let tile_count = (1u64 << zoom) as f64;
    let lat = center.latitude.to_radians();
    let x = (center.longitude + 180.0) / 360.0 * tile_count;
    let y = (1.0 - lat.tan().asinh() / PI) / 2.0 * tile_count;
    (x * TILE_SIZE as f64, y * TILE_SIZE as f64)
}

/// Alpha-blend the marker icon onto the center of the frame.
fn overlay_marker(frame: &mut RgbImage, icon: &RgbaImage) {
    let origin_x = frame.width().saturating_sub(icon.width()) / 2;
    let origin_y = frame.height().saturating_sub(icon.height()) / 2;

    for (icon_x, icon_y, pixel) in icon.enumerate_pixels() {
        let alpha = pixel.0[3] as f32 / 255.0;
        if alpha <= 0.0 {
            continue;
        }
        let x = origin_x + icon_x;
        let y = origin_y + icon_y;
        if x >= frame.width() || y >= frame.height() {
            continue;
        }
        let dst = frame.get_pixel_mut(x, y);
        for channel in 0..3 {
            dst.0[channel] =
                (pixel.0[channel] as f32 * alpha + dst.0[channel] as f32 * (1.0 - alpha)) as u8;
        }
    }
}

/// Map rendering errors, distinct from geocoding failures.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("tile service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("tile {z}/{x}/{y} rejected (HTTP 403): invalid API key or rate limit exceeded")]
    Forbidden { z: u32, x: u32, y: u32 },

    #[error("tile {z}/{x}/{y} returned HTTP {status}")]
    TileStatus {
        z: u32,
        x: u32,
        y: u32,
        status: StatusCode,
    },

    #[error("tile {z}/{x}/{y} could not be decoded: {source}")]
    TileDecode {
        z: u32,
        x: u32,
        y: u32,
        source: image::ImageError,
    },
}

// SPDX-License-Identifier: MIT

//! Poster pipeline: circular mask, A3 canvas composition, text, PNG.
//!
//! `PosterService::generate` is the whole submission pipeline as a single
//! function, decoupled from the web layer: geocode, render the map frame,
//! then mask/compose/encode on a blocking thread.

use crate::assets::Assets;
use crate::error::AppError;
use crate::models::{Coordinates, PosterRequest};
use crate::services::{GeocodingClient, MapRenderer};
use image::{ImageEncoder, Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use std::io::Cursor;
use std::sync::Arc;

/// Poster canvas width (ISO A3 at ~300 dpi).
pub const CANVAS_WIDTH: u32 = 3508;
/// Poster canvas height (ISO A3 at ~300 dpi).
pub const CANVAS_HEIGHT: u32 = 4961;
/// Radius of the circular map crop.
pub const MASK_RADIUS: u32 = 1500;

const MAP_PASTE_TOP: i64 = 100;
const TITLE_FONT_SIZE: f32 = 650.0;
const BODY_FONT_SIZE: f32 = 160.0;
const TITLE_OFFSET: i32 = -300;
const SUBTITLE_OFFSET: i32 = 500;
const LINE_SPACING: f32 = 4.0;

/// End-to-end poster generation.
#[derive(Clone)]
pub struct PosterService {
    geocoder: GeocodingClient,
    map_renderer: MapRenderer,
    assets: Arc<Assets>,
}

impl PosterService {
    pub fn new(
        geocoder: GeocodingClient,
        map_renderer: MapRenderer,
        assets: Arc<Assets>,
    ) -> Self {
        Self {
            geocoder,
            map_renderer,
            assets,
        }
    }

    /// Run the full pipeline for one validated request.
    pub async fn generate(&self, request: PosterRequest) -> Result<Vec<u8>, AppError> {
        let coords = self.geocoder.locate(&request.address).await?;
        tracing::info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "Address geocoded"
        );

        let frame = self
            .map_renderer
            .render(coords, &self.assets.marker_icon)
            .await?;
        tracing::info!("Map frame rendered");

        // Raster work is CPU-bound; keep it off the async workers
        let assets = Arc::clone(&self.assets);
        let png = tokio::task::spawn_blocking(move || {
            let masked = apply_circular_mask(&frame, MASK_RADIUS);
            let canvas = compose_poster(&masked, &request, coords, &assets);
            encode_png(&canvas)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("compose task failed: {e}")))??;

        Ok(png)
    }
}

/// Restrict `frame` to a centered disc of `radius`, white outside.
///
/// Channel-wise `(src AND mask) + NOT mask` with a binary disc mask: the
/// interior keeps the source pixel, the exterior becomes 255. A pixel is
/// inside the disc iff `dx*dx + dy*dy <= radius*radius` from the frame
/// center. No anti-aliasing, so re-applying the same mask is a no-op.
pub fn apply_circular_mask(frame: &RgbImage, radius: u32) -> RgbImage {
    let (width, height) = frame.dimensions();
    let center_x = (width / 2) as i64;
    let center_y = (height / 2) as i64;
    let radius_squared = radius as i64 * radius as i64;

    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = x as i64 - center_x;
        let dy = y as i64 - center_y;
        let mask: u8 = if dx * dx + dy * dy <= radius_squared {
            255
        } else {
            0
        };
        let src = frame.get_pixel(x, y);
        for channel in 0..3 {
            pixel.0[channel] = (src.0[channel] & mask) + !mask;
        }
    }
    out
}

/// Compose the final canvas: pasted map circle, title, subtitle block.
pub fn compose_poster(
    masked: &RgbImage,
    request: &PosterRequest,
    coords: Coordinates,
    assets: &Assets,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgb([255, 255, 255]));

    let paste_x = (CANVAS_WIDTH.saturating_sub(masked.width()) / 2) as i64;
    image::imageops::replace(&mut canvas, masked, paste_x, MAP_PASTE_TOP);

    let anchor = (CANVAS_HEIGHT as f32 * 5.0 / 7.0) as i32;

    let title = request.title();
    let title_width = text_width(&assets.title_font, TITLE_FONT_SIZE, &title);
    let title_x = ((CANVAS_WIDTH as f32 - title_width) / 2.0).round() as i32;
    draw_text(
        &mut canvas,
        &assets.title_font,
        TITLE_FONT_SIZE,
        title_x,
        anchor + TITLE_OFFSET,
        &title,
    );

    // Date, blank spacer line, coordinates; each line centered on its own
    let lines = [
        request.formatted_date(),
        String::new(),
        coords.display_pair(),
    ];
    let body_metrics = assets.body_font.v_metrics(Scale::uniform(BODY_FONT_SIZE));
    let line_height = (body_metrics.ascent - body_metrics.descent + LINE_SPACING).round() as i32;
    let mut line_top = anchor + SUBTITLE_OFFSET;
    for line in &lines {
        if !line.is_empty() {
            let width = text_width(&assets.body_font, BODY_FONT_SIZE, line);
            let x = ((CANVAS_WIDTH as f32 - width) / 2.0).round() as i32;
            draw_text(&mut canvas, &assets.body_font, BODY_FONT_SIZE, x, line_top, line);
        }
        line_top += line_height;
    }

    canvas
}

/// Serialize the canvas to PNG bytes in memory.
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>, ComposeError> {
    let mut cursor = Cursor::new(Vec::new());
    let encoder = image::codecs::png::PngEncoder::new(&mut cursor);
    encoder.write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgb8.into(),
    )?;
    Ok(cursor.into_inner())
}

/// Rendered width of `text`, from glyph bounding boxes.
pub fn text_width(font: &Font<'_>, size: f32, text: &str) -> f32 {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .map(|bb| bb.max.x as f32)
        .fold(0.0, f32::max)
}

/// Draw black text with `top` as the top of the line box (ascent-aware).
fn draw_text(canvas: &mut RgbImage, font: &Font<'_>, size: f32, x: i32, top: i32, text: &str) {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let baseline = top as f32 + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(x as f32, baseline)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                if coverage <= 0.0 {
                    return;
                }
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= canvas.width() || py >= canvas.height() {
                    return;
                }
                let keep = 1.0 - coverage;
                let dst = canvas.get_pixel_mut(px, py);
                for channel in 0..3 {
                    dst.0[channel] = (dst.0[channel] as f32 * keep) as u8;
                }
            });
        }
    }
}

/// Composition-stage errors. These should not occur under fixed inputs but
/// must never crash the session silently.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

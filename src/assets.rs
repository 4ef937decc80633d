// SPDX-License-Identifier: MIT

//! Static assets loaded once at startup: marker icon and the two fonts.
//!
//! Loading happens before the server starts taking requests; a missing or
//! unreadable asset is fatal.

use image::RgbaImage;
use rusttype::Font;
use std::fs;
use std::path::{Path, PathBuf};

/// Size of the marker icon as pasted on the map, in pixels.
pub const MARKER_ICON_SIZE: u32 = 120;

const MARKER_ICON_FILE: &str = "heart.png";
const TITLE_FONT_FILE: &str = "Fashion Script.otf";
const BODY_FONT_FILE: &str = "CaviarDreams.ttf";

/// Read-only, process-wide assets.
pub struct Assets {
    /// Decorative script font for the title line
    pub title_font: Font<'static>,
    /// Body font for the date/coordinates block
    pub body_font: Font<'static>,
    /// Marker icon, already sized for pasting
    pub marker_icon: RgbaImage,
}

impl Assets {
    /// Load all assets from `dir`, failing on the first missing one.
    pub fn load(dir: &str) -> Result<Self, AssetError> {
        let dir = Path::new(dir);

        let marker = image::open(dir.join(MARKER_ICON_FILE))
            .map_err(|source| AssetError::Image {
                path: dir.join(MARKER_ICON_FILE),
                source,
            })?
            .to_rgba8();
        let marker_icon = image::imageops::resize(
            &marker,
            MARKER_ICON_SIZE,
            MARKER_ICON_SIZE,
            image::imageops::FilterType::Lanczos3,
        );

        Ok(Self {
            title_font: load_font(&dir.join(TITLE_FONT_FILE))?,
            body_font: load_font(&dir.join(BODY_FONT_FILE))?,
            marker_icon,
        })
    }

    /// Whether all asset files exist under `dir`.
    ///
    /// Integration tests use this to skip glyph-rasterizing cases on
    /// checkouts that do not carry the font binaries.
    pub fn available(dir: &str) -> bool {
        [MARKER_ICON_FILE, TITLE_FONT_FILE, BODY_FONT_FILE]
            .iter()
            .all(|f| Path::new(dir).join(f).exists())
    }
}

fn load_font(path: &PathBuf) -> Result<Font<'static>, AssetError> {
    let bytes = fs::read(path).map_err(|source| AssetError::Io {
        path: path.clone(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| AssetError::Font { path: path.clone() })
}

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode image asset {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Not a usable font file: {path}")]
    Font { path: PathBuf },
}

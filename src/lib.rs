// SPDX-License-Identifier: MIT

//! Valentine-Poster: turn a meeting place and a date into a printable poster
//!
//! This crate provides the backend for generating couple posters: it
//! geocodes a free-text address, renders a tile map centered on the result,
//! crops the map into a circle and composes it with stylized text on an
//! A3 canvas, served as a PNG download from a small web form.

pub mod assets;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::PosterService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub poster_service: PosterService,
}

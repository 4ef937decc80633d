// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod geocoding;
pub mod map;
pub mod poster;

pub use geocoding::GeocodingClient;
pub use map::MapRenderer;
pub use poster::PosterService;

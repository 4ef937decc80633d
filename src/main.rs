// SPDX-License-Identifier: MIT

//! Valentine-Poster server
//!
//! Serves the poster form and generates personalized map posters by
//! geocoding an address, compositing map tiles and drawing the couple's
//! names and meeting date.

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use valentine_poster::{
    assets::Assets,
    config::Config,
    services::{GeocodingClient, MapRenderer, PosterService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Valentine-Poster");

    // Fonts and the marker icon must load before we serve anything
    let assets = Assets::load(&config.assets_dir).expect("Failed to load assets");
    tracing::info!(dir = %config.assets_dir, "Assets loaded");

    // One HTTP client for both upstreams, with an explicit timeout so a
    // hanging geocoder or tile service cannot hang a submission forever
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    let assets = Arc::new(assets);
    let poster_service = PosterService::new(
        GeocodingClient::new(http.clone(), config.geocoder_url.clone()),
        MapRenderer::new(
            http,
            config.tile_url_template.clone(),
            config.tile_api_key.clone(),
        ),
        assets,
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        poster_service,
    });

    // Build router
    let app = valentine_poster::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("valentine_poster=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

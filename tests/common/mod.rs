// SPDX-License-Identifier: MIT

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use valentine_poster::assets::Assets;
use valentine_poster::config::Config;
use valentine_poster::routes::create_router;
use valentine_poster::services::{GeocodingClient, MapRenderer, PosterService};
use valentine_poster::AppState;

/// Geocoder stub body for Paris (BAN-style FeatureCollection).
#[allow(dead_code)]
pub const PARIS_FEATURES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [2.3522, 48.8566] },
            "properties": { "label": "Paris" }
        }
    ]
}"#;

/// Geocoder stub body with no candidates.
#[allow(dead_code)]
pub const EMPTY_FEATURES: &str = r#"{ "type": "FeatureCollection", "features": [] }"#;

/// Check if the font/icon assets are present in this checkout.
#[allow(dead_code)]
pub fn assets_available() -> bool {
    Assets::available("assets")
}

/// Skip test with message if the asset files are not present.
#[macro_export]
macro_rules! require_assets {
    () => {
        if !crate::common::assets_available() {
            eprintln!("⚠️  Skipping: font/icon assets not present under assets/");
            return;
        }
    };
}

/// Spawn a stub geocoder returning `status` and `body` for GET /search/.
#[allow(dead_code)]
pub async fn spawn_geocoder_stub(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route("/search/", get(move || async move { (status, body) }));
    spawn_stub(app).await + "/search/"
}

/// Spawn a stub tile server answering every tile with a solid-color PNG.
#[allow(dead_code)]
pub async fn spawn_tile_stub(gray: u8) -> String {
    let tile = tile_png(gray);
    let app = Router::new().route(
        "/tiles/{z}/{x}/{file}",
        get(move || {
            let tile = tile.clone();
            async move { ([(axum::http::header::CONTENT_TYPE, "image/png")], tile) }
        }),
    );
    spawn_stub(app).await + "/tiles/{z}/{x}/{y}.png"
}

/// Spawn a stub tile server rejecting every tile with the given status.
#[allow(dead_code)]
pub async fn spawn_failing_tile_stub(status: StatusCode) -> String {
    let app = Router::new().route(
        "/tiles/{z}/{x}/{file}",
        get(move || async move { (status, "denied") }),
    );
    spawn_stub(app).await + "/tiles/{z}/{x}/{y}.png"
}

#[allow(dead_code)]
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    format!("http://{}", addr)
}

/// A 256x256 solid-gray PNG tile.
#[allow(dead_code)]
pub fn tile_png(gray: u8) -> Vec<u8> {
    let tile = image::RgbImage::from_pixel(256, 256, image::Rgb([gray, gray, gray]));
    valentine_poster::services::poster::encode_png(&tile).expect("encode stub tile")
}

/// Create a test app wired to the given stub endpoints.
///
/// Requires the real assets (use `require_assets!` first).
#[allow(dead_code)]
pub fn create_test_app(geocoder_url: String, tile_url_template: String) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.geocoder_url = geocoder_url;
    config.tile_url_template = tile_url_template;

    let assets = Arc::new(Assets::load(&config.assets_dir).expect("Failed to load assets"));
    let http = reqwest::Client::new();

    let poster_service = PosterService::new(
        GeocodingClient::new(http.clone(), config.geocoder_url.clone()),
        MapRenderer::new(
            http,
            config.tile_url_template.clone(),
            config.tile_api_key.clone(),
        ),
        assets,
    );

    let state = Arc::new(AppState {
        config,
        poster_service,
    });

    (create_router(state.clone()), state)
}

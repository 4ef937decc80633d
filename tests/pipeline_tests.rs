// SPDX-License-Identifier: MIT

//! End-to-end tests of the HTTP surface against stub upstreams.
//!
//! These go through the real router and pipeline, so they need the font and
//! icon assets and skip when those are absent.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{
    create_test_app, spawn_failing_tile_stub, spawn_geocoder_stub, spawn_tile_stub,
    EMPTY_FEATURES, PARIS_FEATURES,
};
use serde_json::json;
use tower::ServiceExt;

const TILE_GRAY: u8 = 90;

fn poster_request_body() -> Body {
    Body::from(
        json!({
            "name1": "Roméo",
            "name2": "Juliette",
            "meeting_date": "2024-02-14",
            "address": "Paris"
        })
        .to_string(),
    )
}

fn post_poster(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/poster")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::OK, PARIS_FEATURES).await;
    let tiles = spawn_tile_stub(TILE_GRAY).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_form_page_served() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::OK, PARIS_FEATURES).await;
    let tiles = spawn_tile_stub(TILE_GRAY).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("Générer le poster"));
    assert!(page.contains("Roméo"));
}

#[tokio::test]
async fn test_end_to_end_poster_generation() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::OK, PARIS_FEATURES).await;
    let tiles = spawn_tile_stub(TILE_GRAY).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let response = app.oneshot(post_poster(poster_request_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .contains("poster.png"));

    let body = axum::body::to_bytes(response.into_body(), 256 << 20).await.unwrap();
    let poster = image::load_from_memory(&body).expect("valid PNG").to_rgb8();
    assert_eq!(poster.dimensions(), (3508, 4961));

    // Inside the circle: tile-colored; outside (within the map square): white
    let circle_x = (3508 - 3200) / 2 + 1600;
    let circle_y = 100 + 1600;
    assert_eq!(
        poster.get_pixel(circle_x, circle_y - 400),
        &image::Rgb([TILE_GRAY, TILE_GRAY, TILE_GRAY])
    );
    assert_eq!(
        poster.get_pixel((3508 - 3200) / 2 + 20, 120),
        &image::Rgb([255, 255, 255])
    );

    // Title band carries ink
    let title_top = (4961.0f32 * 5.0 / 7.0) as u32 - 300;
    let has_ink = (title_top..title_top + 600).any(|y| {
        (0..3508u32).any(|x| poster.get_pixel(x, y).0.iter().any(|&c| c < 128))
    });
    assert!(has_ink, "title band must contain rendered text");
}

#[tokio::test]
async fn test_unknown_address_reports_not_found() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::OK, EMPTY_FEATURES).await;
    let tiles = spawn_tile_stub(TILE_GRAY).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let response = app.oneshot(post_poster(poster_request_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "address_not_found");
}

#[tokio::test]
async fn test_tile_failure_reports_distinct_map_error() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::OK, PARIS_FEATURES).await;
    let tiles = spawn_failing_tile_stub(StatusCode::FORBIDDEN).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let response = app.oneshot(post_poster(poster_request_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "map_error");
}

#[tokio::test]
async fn test_geocoder_failure_reports_geocoding_error() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::BAD_GATEWAY, "upstream sad").await;
    let tiles = spawn_tile_stub(TILE_GRAY).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let response = app.oneshot(post_poster(poster_request_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "geocoding_error");
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    require_assets!();
    let geocoder = spawn_geocoder_stub(StatusCode::OK, PARIS_FEATURES).await;
    let tiles = spawn_tile_stub(TILE_GRAY).await;
    let (app, _state) = create_test_app(geocoder, tiles);

    let body = Body::from(
        json!({
            "name1": "",
            "name2": "Juliette",
            "meeting_date": "2024-02-14",
            "address": "Paris"
        })
        .to_string(),
    );
    let response = app.oneshot(post_poster(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "bad_request");
}

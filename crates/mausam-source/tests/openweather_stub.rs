use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use mausam_core::{ProviderError, WeatherSource};
use mausam_source::{OpenWeatherConfig, OpenWeatherSource};
use tokio::net::TcpListener;

async fn weather(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if q.get("appid").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"cod": 401, "message": "Invalid API key"})),
        )
            .into_response();
    }
    if q.get("units").map(String::as_str) != Some("metric") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match q.get("q").map(String::as_str) {
        Some("Delhi,IN") => Json(serde_json::json!({
            "weather": [{"main": "Clear", "description": "clear sky"}],
            "main": {"temp": 38.4, "feels_like": 37.9, "humidity": 21},
            "wind": {"speed": 4.1},
            "dt": 1717243200,
            "name": "Delhi"
        }))
        .into_response(),
        Some("Broken,IN") => (StatusCode::OK, "not json").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
            .into_response(),
    }
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new().route("/data/2.5/weather", get(weather));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source(addr: SocketAddr, key: &str) -> OpenWeatherSource {
    let mut config = OpenWeatherConfig::new(key);
    config.base_url = format!("http://{addr}/data/2.5");
    config.timeout_secs = 5;
    OpenWeatherSource::new(config).unwrap()
}

#[tokio::test]
async fn fetch_current_maps_provider_payload() {
    let addr = spawn_stub().await;
    let reading = source(addr, "test-key")
        .fetch_current("Delhi", "IN")
        .await
        .unwrap();

    assert_eq!(reading.city_name, "Delhi");
    assert_eq!(reading.main, "Clear");
    assert_eq!(reading.temp, 38.4);
    assert_eq!(reading.humidity, 21);
    assert_eq!(reading.dt, 1_717_243_200);
}

#[tokio::test]
async fn fetch_raw_passes_payload_through() {
    let addr = spawn_stub().await;
    let raw = source(addr, "test-key").fetch_raw("Delhi", "IN").await.unwrap();
    assert_eq!(raw["name"], "Delhi");
    assert_eq!(raw["weather"][0]["description"], "clear sky");
}

#[tokio::test]
async fn non_success_status_is_provider_error() {
    let addr = spawn_stub().await;

    let err = source(addr, "wrong-key")
        .fetch_current("Delhi", "IN")
        .await
        .unwrap_err();
    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = source(addr, "test-key")
        .fetch_current("Atlantis", "IN")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 404, .. }));
}

#[tokio::test]
async fn malformed_payload_is_parse_error() {
    let addr = spawn_stub().await;
    let err = source(addr, "test-key")
        .fetch_current("Broken", "IN")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)));
}

#[tokio::test]
async fn unreachable_provider_is_request_error() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(addr, "test-key")
        .fetch_current("Delhi", "IN")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Request(_)));
}

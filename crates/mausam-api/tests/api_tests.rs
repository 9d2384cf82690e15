use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use mausam_api::{build_app, set_ready, Backends};
use mausam_core::{
    AlertReading, AlertThreshold, DailySummary, MemoryStore, NewReading, ProviderError,
    ProviderResult, Reading, ReadingStore, StoreError, StoreResult, ThresholdStore, Timestamp,
    WeatherSource,
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubSource;

#[async_trait::async_trait]
impl WeatherSource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_current(&self, city: &str, _country: &str) -> ProviderResult<NewReading> {
        Err(ProviderError::Request(format!("not used for {city}")))
    }

    async fn fetch_raw(&self, city: &str, country: &str) -> ProviderResult<Value> {
        if city == "Nowhere" {
            return Err(ProviderError::Status {
                status: 404,
                body: "city not found".into(),
            });
        }
        Ok(json!({"name": city, "sys": {"country": country}, "main": {"temp": 29.5}}))
    }
}

/// Store whose backend is always down
struct DownStore;

#[async_trait::async_trait]
impl ReadingStore for DownStore {
    async fn insert(&self, _reading: &NewReading) -> StoreResult<Reading> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn aggregate_by_day(&self) -> StoreResult<Vec<DailySummary>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_alert_candidates(
        &self,
        _since: Timestamp,
        _threshold: &AlertThreshold,
    ) -> StoreResult<Vec<AlertReading>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn count(&self) -> StoreResult<u64> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[async_trait::async_trait]
impl ThresholdStore for DownStore {
    async fn create(&self, _temperature: f64, _condition: &str) -> StoreResult<AlertThreshold> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn current(&self) -> StoreResult<Option<AlertThreshold>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn history(&self) -> StoreResult<Vec<AlertThreshold>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

fn app_with(store: Arc<MemoryStore>) -> Router {
    let backends = Backends {
        readings: store.clone(),
        thresholds: store,
        source: Arc::new(StubSource),
    };
    build_app(backends).unwrap().0
}

fn down_app() -> Router {
    let store = Arc::new(DownStore);
    let backends = Backends {
        readings: store.clone(),
        thresholds: store,
        source: Arc::new(StubSource),
    };
    build_app(backends).unwrap().0
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn reading(city: &str, main: &str, temp: f64, dt: i64) -> NewReading {
    NewReading {
        city_name: city.into(),
        main: main.into(),
        temp,
        feels_like: temp,
        humidity: 45,
        wind_speed: 3.3,
        dt,
    }
}

#[tokio::test]
async fn thresholds_default_then_update() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let (status, body) = get_json(&app, "/api/weather/thresholds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"temperature": 35.0, "weatherCondition": ""}));

    let (status, body) = post_json(
        &app,
        "/api/weather/thresholds",
        json!({"temperatureThreshold": 40, "weatherCondition": "Rain"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Thresholds updated successfully");
    assert_eq!(
        body["data"],
        json!({"temperatureThreshold": 40.0, "weatherCondition": "Rain"})
    );

    let (_, body) = get_json(&app, "/api/weather/thresholds").await;
    assert_eq!(body["temperature"], 40.0);
    assert_eq!(body["weatherCondition"], "Rain");
    assert!(body["createdAt"].is_string());

    post_json(
        &app,
        "/api/weather/thresholds",
        json!({"temperatureThreshold": 42.5, "weatherCondition": ""}),
    )
    .await;
    let (_, history) = get_json(&app, "/api/weather/thresholds/history").await;
    let temps: Vec<_> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["temperature"].as_f64().unwrap())
        .collect();
    assert_eq!(temps, [40.0, 42.5]);
}

#[tokio::test]
async fn missing_threshold_fields_take_defaults() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, body) = post_json(&app, "/api/weather/thresholds", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"temperatureThreshold": 35.0, "weatherCondition": ""})
    );
}

#[tokio::test]
async fn alerts_use_current_threshold() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now().timestamp();
    store.create(40.0, "Rain").await.unwrap();
    store.insert(&reading("Delhi", "Clear", 42.0, now)).await.unwrap();
    store.insert(&reading("Mumbai", "Rain", 20.0, now - 60)).await.unwrap();
    store.insert(&reading("Chennai", "Clouds", 30.0, now)).await.unwrap();
    store.insert(&reading("Kolkata", "Rain", 20.0, now - 7200)).await.unwrap();
    let app = app_with(store);

    let (status, body) = get_json(&app, "/api/weather/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"cityName": "Delhi", "temp": 42.0, "main": "Clear", "dt": now},
            {"cityName": "Mumbai", "temp": 20.0, "main": "Rain", "dt": now - 60},
        ])
    );
}

#[tokio::test]
async fn daily_summary_endpoint() {
    let store = Arc::new(MemoryStore::new());
    let day = 1_717_200_000;
    for temp in [30.0, 38.0, 36.0] {
        store.insert(&reading("Delhi", "Clear", temp, day + 3600)).await.unwrap();
    }
    store.insert(&reading("Bangalore", "Clouds", 24.0, day + 7200)).await.unwrap();
    let app = app_with(store);

    let (status, body) = get_json(&app, "/api/weather/daily-summary").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<DailySummary> = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].city_name, "Bangalore");
    assert_eq!(rows[1].average_temp, 34.7);
    assert_eq!(body[1]["date"], json!({"year": 2024, "month": 6, "day": 1}));
    assert_eq!(body[1]["dominantWeather"], "Clear");
}

#[tokio::test]
async fn current_passes_provider_payload_through() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());

    let (status, body) = get_json(&app, "/api/weather/current/Pune").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pune");
    assert_eq!(body["sys"]["country"], "IN");
    // Not persisted
    assert_eq!(store.count().await.unwrap(), 0);

    let (status, body) = get_json(&app, "/api/weather/current/Nowhere").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn store_failures_are_generic_server_errors() {
    let app = down_app();

    let (status, body) = get_json(&app, "/api/weather/daily-summary").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("connection refused"));

    let (status, _) = get_json(&app, "/api/weather/alerts").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = get_json(&app, "/api/weather/thresholds").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error fetching thresholds");

    let (status, body) = post_json(
        &app,
        "/api/weather/thresholds",
        json!({"temperatureThreshold": 30, "weatherCondition": "Rain"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error updating thresholds");
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn health_ready_metrics_endpoints() {
    let store = Arc::new(MemoryStore::new());
    let backends = Backends {
        readings: store.clone(),
        thresholds: store,
        source: Arc::new(StubSource),
    };
    let (app, state) = build_app(backends).unwrap();

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    set_ready(&state, true);
    let res = app
        .clone()
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ct = res.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain"));
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("mausam_requests_total"));
}

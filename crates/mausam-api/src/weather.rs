//! Weather routes: daily summary, live passthrough, alerts and thresholds

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use mausam_core::{
    find_alert_candidates, AlertReading, AlertThreshold, DailySummary,
    DEFAULT_ALERT_WINDOW_SECS, DEFAULT_COUNTRY_CODE, DEFAULT_TEMPERATURE_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/daily-summary", get(daily_summary))
        .route("/current/:city", get(current))
        .route("/alerts", get(alerts))
        .route("/thresholds", get(get_thresholds).post(update_thresholds))
        .route("/thresholds/history", get(threshold_history))
}

async fn daily_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DailySummary>>, ApiError> {
    state.count_request("daily-summary");
    let summary = state.backends.readings.aggregate_by_day().await?;
    Ok(Json(summary))
}

/// Live provider payload; nothing is stored
async fn current(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.count_request("current");
    let raw = state
        .backends
        .source
        .fetch_raw(&city, DEFAULT_COUNTRY_CODE)
        .await?;
    Ok(Json(raw))
}

async fn alerts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<AlertReading>>, ApiError> {
    state.count_request("alerts");
    let backends = &state.backends;
    let alerts = find_alert_candidates(
        backends.readings.as_ref(),
        backends.thresholds.as_ref(),
        DEFAULT_ALERT_WINDOW_SECS,
        Utc::now().timestamp(),
    )
    .await?;
    Ok(Json(alerts))
}

async fn get_thresholds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AlertThreshold>, ApiError> {
    state.count_request("thresholds");
    let current = state
        .backends
        .thresholds
        .get_current()
        .await
        .map_err(ApiError::thresholds("Error fetching thresholds"))?;
    Ok(Json(current))
}

async fn threshold_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AlertThreshold>>, ApiError> {
    state.count_request("thresholds-history");
    let history = state
        .backends
        .thresholds
        .history()
        .await
        .map_err(ApiError::thresholds("Error fetching thresholds"))?;
    Ok(Json(history))
}

/// Body of `POST /thresholds`. Missing fields fall back to the defaults;
/// values are not otherwise validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdUpdate {
    #[serde(default)]
    pub temperature_threshold: Option<f64>,
    #[serde(default)]
    pub weather_condition: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedThresholds {
    pub temperature_threshold: f64,
    pub weather_condition: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThresholdUpdateResponse {
    pub message: String,
    pub data: AcceptedThresholds,
}

async fn update_thresholds(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ThresholdUpdate>,
) -> Result<Json<ThresholdUpdateResponse>, ApiError> {
    state.count_request("thresholds-update");
    let temperature = update
        .temperature_threshold
        .unwrap_or(DEFAULT_TEMPERATURE_THRESHOLD);
    let condition = update.weather_condition.unwrap_or_default();

    let created = state
        .backends
        .thresholds
        .create(temperature, &condition)
        .await
        .map_err(ApiError::thresholds("Error updating thresholds"))?;
    info!(
        temperature = created.temperature,
        condition = %created.weather_condition,
        "Alert thresholds updated"
    );

    Ok(Json(ThresholdUpdateResponse {
        message: "Thresholds updated successfully".to_string(),
        data: AcceptedThresholds {
            temperature_threshold: created.temperature,
            weather_condition: created.weather_condition,
        },
    }))
}

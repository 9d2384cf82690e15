use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mausam_core::{ProviderError, StoreError};
use serde_json::json;

/// Every failure is a 500 carrying the underlying message
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{message}: {source}")]
    Thresholds {
        message: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    pub fn thresholds(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Thresholds { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = match &self {
            ApiError::Store(e) => json!({ "message": e.to_string() }),
            ApiError::Provider(e) => json!({ "message": e.to_string() }),
            ApiError::Thresholds { message, source } => {
                json!({ "message": message, "error": source.to_string() })
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

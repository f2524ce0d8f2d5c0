use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use service::prediction::PredictError;
use thiserror::Error;

pub const PREDICTION_FAILED: &str = "Failed to get prediction from ML service.";
pub const INVALID_PAYLOAD: &str = "Invalid courier feature payload.";

/// Every error body has the shape `{"message": ..., "error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Upstream(#[from] PredictError),
    #[error("not found: {0}")]
    NotFound(String),
    /// Storage failures from the courier store.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::InvalidPayload(e) => (StatusCode::UNPROCESSABLE_ENTITY, INVALID_PAYLOAD, e.clone()),
            ApiError::BadRequest(e) => (StatusCode::BAD_REQUEST, "Malformed request.", e.clone()),
            ApiError::Upstream(e) => (StatusCode::INTERNAL_SERVER_ERROR, PREDICTION_FAILED, e.client_message()),
            ApiError::NotFound(e) => (StatusCode::NOT_FOUND, "Resource not found.", e.clone()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.", "internal error".into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error) = self.parts();
        (status, Json(serde_json::json!({"message": message, "error": error}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Validation(msg) => ApiError::InvalidPayload(msg),
            ServiceError::Model(m) => ApiError::InvalidPayload(m.to_string()),
            ServiceError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

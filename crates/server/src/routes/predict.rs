use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use models::CourierFeatures;
use tracing::{info, warn};

use crate::{errors::ApiError, observability, state::AppState};

/// Relay one feature payload to the ML service and hand its answer back untouched.
#[utoipa::path(
    post, path = "/api/predict", tag = "prediction",
    request_body = crate::openapi::CourierFeaturesDoc,
    responses(
        (status = 200, description = "Prediction relayed from the ML service", body = crate::openapi::PredictionResultDoc),
        (status = 422, description = "Invalid courier feature payload", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "ML service failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<CourierFeatures>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(features) = payload.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
    features
        .validate()
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

    match state.predictor.predict(&features).await {
        Ok(body) => {
            info!(past_late_count = features.past_late_count, rating = features.rating, "prediction relayed");
            Ok(([(header::CONTENT_TYPE, "application/json")], body.into_bytes()).into_response())
        }
        Err(e) => {
            observability::record_upstream_failure(&e);
            warn!(reason = e.reason(), error = %e, "prediction request failed");
            Err(ApiError::Upstream(e))
        }
    }
}

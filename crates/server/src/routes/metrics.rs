use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use prometheus::TEXT_FORMAT;

use crate::observability;

/// Prometheus text exposition of the process-wide counters.
#[utoipa::path(
    get, path = "/api/metrics", tag = "observability",
    responses(
        (status = 200, description = "Counters in Prometheus text format", body = String, content_type = "text/plain"),
        (status = 500, description = "Encoding failed")
    )
)]
pub async fn metrics() -> Response {
    let (status, body) = observability::encode_metrics();
    (status, [(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response()
}

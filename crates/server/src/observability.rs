use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::prediction::PredictError;

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "app_requests_total",
        "The total number of requests.",
        &["endpoint"]
    )
    .expect("register app_requests_total")
});

pub static UPSTREAM_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "app_upstream_failures_total",
        "The total number of failed calls to the ML service.",
        &["reason"]
    )
    .expect("register app_upstream_failures_total")
});

/// Endpoint labels that render from startup, before any traffic.
pub const TRACKED_ENDPOINTS: [&str; 3] = ["/api/predict", "/api/metrics", "/api/couriers"];

/// Register all counters and materialise their known label sets at zero.
pub fn init_metrics() {
    for endpoint in TRACKED_ENDPOINTS {
        REQUESTS_TOTAL.with_label_values(&[endpoint]);
    }
    for reason in PredictError::all_reasons() {
        UPSTREAM_FAILURES_TOTAL.with_label_values(&[reason]);
    }
}

pub fn record_request(endpoint: &str) {
    REQUESTS_TOTAL.with_label_values(&[endpoint]).inc();
}

pub fn record_upstream_failure(err: &PredictError) {
    UPSTREAM_FAILURES_TOTAL.with_label_values(&[err.reason()]).inc();
}

/// Route-layer middleware: one increment per handled request, keyed by the
/// matched route template so path parameters do not explode label cardinality.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    record_request(&endpoint);
    next.run(req).await
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    match String::from_utf8(buffer) {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}")),
    }
}

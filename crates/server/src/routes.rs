use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{observability, openapi::ApiDoc, state::AppState};

pub mod couriers;
pub mod metrics;
pub mod predict;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict::predict))
        .route("/metrics", get(metrics::metrics))
        .route("/couriers", get(couriers::list))
        .route("/couriers/:id", get(couriers::get))
        .route("/openapi.json", get(openapi_json))
}

/// Build the full application router.
///
/// `/api/*` is the canonical surface; `/predict` and `/metrics` are served at
/// the root as well. Unmatched paths fall through to the client assets.
pub fn build_router(state: AppState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let static_dir = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    // Counted routes
    let tracked = Router::new()
        .nest("/api", api_routes())
        .route("/predict", post(predict::predict))
        .route("/metrics", get(metrics::metrics))
        .route_layer(middleware::from_fn(observability::track_requests));

    Router::new()
        .route("/health", get(health))
        .merge(tracked)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged as errors
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

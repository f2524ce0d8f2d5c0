use std::sync::Arc;

use axum::Router;
use common::utils::logging::{self, LogStyle};
use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use service::{courier_store::CourierStore, prediction::HttpPredictor};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{errors::StartupError, observability, routes, state::AppState};

fn init_logging(format: LogFormat) {
    logging::init_logging(match format {
        LogFormat::Compact => LogStyle::Compact,
        LogFormat::Json => LogStyle::Json,
    });
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Build shared state: open and seed the courier store, wire the ML client.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let couriers = CourierStore::new(&cfg.couriers.data_path)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let seeded = couriers
        .seed_if_empty(cfg.couriers.seed_count)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    if seeded > 0 {
        info!(seeded, path = %cfg.couriers.data_path.display(), "courier store was empty; seeded");
    }

    let predictor = HttpPredictor::new(cfg.ml_service.predict_url(), cfg.ml_service.timeout())
        .map_err(|e| StartupError::Runtime(format!("cannot build ML client: {e}")))?;
    info!(url = predictor.url(), timeout_secs = cfg.ml_service.timeout_secs, "ML service client ready");

    Ok(AppState::new(Arc::new(predictor), couriers))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = load_config()?;
    init_logging(cfg.observability.log_format);

    if cfg.observability.sentry_dsn.is_some() {
        info!("error-reporting DSN configured; no reporter is wired in this build");
    }
    info!(driver = ?cfg.observability.broadcast_driver, "broadcast driver selected");

    let data_dir = cfg
        .couriers
        .data_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    common::env::ensure_env(&cfg.server.frontend_dir, &data_dir).await?;

    observability::init_metrics();
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors(), &cfg.server.frontend_dir);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, "starting courier risk server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}

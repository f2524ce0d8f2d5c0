use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ml_service: MlServiceConfig,
    #[serde(default)]
    pub couriers: CourierConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, frontend_dir: default_frontend_dir() }
    }
}

/// Where the external prediction service lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct MlServiceConfig {
    pub base_url: String,
    #[serde(default = "default_predict_path")]
    pub predict_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MlServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ml-api:8000".into(),
            predict_path: default_predict_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourierConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self { data_path: default_data_path(), seed_count: default_seed_count() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Broadcast transport selection. Logged at startup; nothing in
/// the request path broadcasts.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastDriver {
    Pusher,
    Redis,
    Log,
    #[default]
    Null,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub sentry_dsn: Option<String>,
    #[serde(default)]
    pub broadcast_driver: BroadcastDriver,
}

fn default_frontend_dir() -> String { "frontend".into() }
fn default_predict_path() -> String { "/predict".into() }
fn default_timeout_secs() -> u64 { 10 }
fn default_data_path() -> PathBuf { PathBuf::from("data/couriers.json") }
fn default_seed_count() -> usize { 10 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), fall back to defaults when the
    /// file is missing, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
                _ => return Err(e),
            },
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment-style lookups. Unparseable numeric
    /// values are ignored and the configured value kept.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup("ML_SERVICE_URL") {
            self.ml_service.base_url = url;
        }
        if let Some(secs) = lookup("ML_SERVICE_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.ml_service.timeout_secs = secs;
        }
        if let Some(dsn) = lookup("SENTRY_DSN") {
            self.observability.sentry_dsn = Some(dsn);
        }
        if let Some(driver) = lookup("BROADCAST_DRIVER").and_then(|d| parse_broadcast_driver(&d)) {
            self.observability.broadcast_driver = driver;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.observability.log_format = match format.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Compact,
            };
        }
        if let Some(path) = lookup("COURIER_DATA_PATH") {
            self.couriers.data_path = PathBuf::from(path);
        }
        if let Some(count) = lookup("COURIER_SEED_COUNT").and_then(|c| c.parse().ok()) {
            self.couriers.seed_count = count;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.ml_service.normalize_and_validate()?;
        self.observability.normalize();
        Ok(())
    }
}

fn parse_broadcast_driver(raw: &str) -> Option<BroadcastDriver> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pusher" => Some(BroadcastDriver::Pusher),
        "redis" => Some(BroadcastDriver::Redis),
        "log" => Some(BroadcastDriver::Log),
        "null" | "" => Some(BroadcastDriver::Null),
        _ => None,
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MlServiceConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow!("ml_service.base_url must start with http:// or https://"));
        }
        if !self.predict_path.starts_with('/') {
            self.predict_path = format!("/{}", self.predict_path);
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("ml_service.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, self.predict_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ObservabilityConfig {
    fn normalize(&mut self) {
        if self.sentry_dsn.as_deref().is_some_and(|d| d.trim().is_empty()) {
            self.sentry_dsn = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_container_deployment() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults are valid");
        assert_eq!(cfg.ml_service.predict_url(), "http://ml-api:8000/predict");
        assert_eq!(cfg.ml_service.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.couriers.seed_count, 10);
        assert_eq!(cfg.observability.broadcast_driver, BroadcastDriver::Null);
        assert!(cfg.observability.sentry_dsn.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg = parse(
            r#"
[server]
host = "0.0.0.0"
port = 9000

[ml_service]
base_url = "http://localhost:8000/"
timeout_secs = 3

[observability]
log_format = "json"
broadcast_driver = "redis"
"#,
        )
        .expect("parse toml");
        let mut cfg = cfg;
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.ml_service.predict_url(), "http://localhost:8000/predict");
        assert_eq!(cfg.ml_service.timeout_secs, 3);
        assert_eq!(cfg.observability.log_format, LogFormat::Json);
        assert_eq!(cfg.observability.broadcast_driver, BroadcastDriver::Redis);
        assert_eq!(cfg.couriers.data_path, PathBuf::from("data/couriers.json"));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "7000"),
            ("ML_SERVICE_URL", "https://ml.internal"),
            ("ML_SERVICE_TIMEOUT_SECS", "not-a-number"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
            ("BROADCAST_DRIVER", "pusher"),
            ("COURIER_SEED_COUNT", "3"),
        ]);
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.ml_service.predict_url(), "https://ml.internal/predict");
        assert_eq!(cfg.ml_service.timeout_secs, 10);
        assert_eq!(cfg.observability.sentry_dsn.as_deref(), Some("https://key@sentry.example/1"));
        assert_eq!(cfg.observability.broadcast_driver, BroadcastDriver::Pusher);
        assert_eq!(cfg.couriers.seed_count, 3);
    }

    #[test]
    fn rejects_invalid_upstream_settings() {
        let mut cfg = AppConfig::default();
        cfg.ml_service.base_url = "ml-api:8000".into();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.ml_service.timeout_secs = 0;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn blank_sentry_dsn_is_dropped() {
        let mut cfg = AppConfig::default();
        cfg.observability.sentry_dsn = Some("  ".into());
        cfg.normalize_and_validate().expect("valid");
        assert!(cfg.observability.sentry_dsn.is_none());
    }
}

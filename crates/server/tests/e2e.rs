use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::{observability, routes, state::AppState};
use service::{courier_store::CourierStore, prediction::HttpPredictor};

const UPSTREAM_BODY: &str = r#"{"courier_id":"C001","risk_score":0.62,"recommend_replacement":true}"#;

struct TestApp {
    base_url: String,
}

async fn start_server(predict_url: String, timeout: Duration) -> anyhow::Result<TestApp> {
    let data_path = std::env::temp_dir().join(format!("e2e_couriers_{}.json", uuid::Uuid::new_v4()));
    let couriers = CourierStore::new(&data_path).await?;
    couriers.seed_if_empty(10).await?;

    let predictor = HttpPredictor::new(predict_url, timeout)?;
    let state = AppState::new(Arc::new(predictor), couriers);

    observability::init_metrics();
    let app = routes::build_router(state, CorsLayer::very_permissive(), "/nonexistent-frontend");
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn sample_features() -> serde_json::Value {
    json!({"past_late_count": 5, "leave_frequency": 2, "avg_delivery_time": 15.5, "rating": 4.2})
}

async fn assert_prediction_failure(res: reqwest::Response) -> anyhow::Result<serde_json::Value> {
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Failed to get prediction from ML service.");
    assert!(body.get("error").is_some(), "missing error key: {body}");
    Ok(body)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server("http://127.0.0.1:9/predict".into(), Duration::from_secs(1)).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_predict_relays_upstream_body_unchanged() -> anyhow::Result<()> {
    let ml = MockServer::start_async().await;
    let mock = ml
        .mock_async(|when, then| {
            when.method(POST).path("/predict").json_body(sample_features());
            then.status(200).header("content-type", "application/json").body(UPSTREAM_BODY);
        })
        .await;
    let app = start_server(ml.url("/predict"), Duration::from_secs(5)).await?;

    let res = reqwest::Client::new()
        .post(format!("{}/api/predict", app.base_url))
        .json(&sample_features())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await?, UPSTREAM_BODY);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn e2e_predict_response_has_prediction_keys() -> anyhow::Result<()> {
    let ml = MockServer::start_async().await;
    ml.mock_async(|when, then| {
        when.method(POST).path("/predict");
        then.status(200).body(UPSTREAM_BODY);
    })
    .await;
    let app = start_server(ml.url("/predict"), Duration::from_secs(5)).await?;

    // root alias of /api/predict
    let res = reqwest::Client::new()
        .post(format!("{}/predict", app.base_url))
        .json(&sample_features())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    for key in ["courier_id", "risk_score", "recommend_replacement"] {
        assert!(body.get(key).is_some(), "missing {key}");
    }
    Ok(())
}

#[tokio::test]
async fn e2e_upstream_error_statuses_become_500() -> anyhow::Result<()> {
    for upstream_status in [500u16, 503, 400, 404] {
        let ml = MockServer::start_async().await;
        ml.mock_async(|when, then| {
            when.method(POST).path("/predict");
            then.status(upstream_status).body("model exploded");
        })
        .await;
        let app = start_server(ml.url("/predict"), Duration::from_secs(5)).await?;

        let res = reqwest::Client::new()
            .post(format!("{}/api/predict", app.base_url))
            .json(&sample_features())
            .send()
            .await?;
        let body = assert_prediction_failure(res).await?;
        assert_eq!(body["error"], format!("ML service returned status {upstream_status}"));
    }
    Ok(())
}

#[tokio::test]
async fn e2e_upstream_timeout_becomes_500() -> anyhow::Result<()> {
    let ml = MockServer::start_async().await;
    ml.mock_async(|when, then| {
        when.method(POST).path("/predict");
        then.status(200).delay(Duration::from_secs(3)).body(UPSTREAM_BODY);
    })
    .await;
    let app = start_server(ml.url("/predict"), Duration::from_millis(250)).await?;

    let res = reqwest::Client::new()
        .post(format!("{}/api/predict", app.base_url))
        .json(&sample_features())
        .send()
        .await?;
    let body = assert_prediction_failure(res).await?;
    assert_eq!(body["error"], "ML service timed out");
    Ok(())
}

#[tokio::test]
async fn e2e_connection_refused_becomes_500() -> anyhow::Result<()> {
    let closed = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = closed.local_addr()?;
    drop(closed);
    let app = start_server(format!("http://{addr}/predict"), Duration::from_secs(2)).await?;

    let res = reqwest::Client::new()
        .post(format!("{}/api/predict", app.base_url))
        .json(&sample_features())
        .send()
        .await?;
    let body = assert_prediction_failure(res).await?;
    assert_eq!(body["error"], "ML service unreachable");
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_payload_fails_fast() -> anyhow::Result<()> {
    let ml = MockServer::start_async().await;
    let mock = ml
        .mock_async(|when, then| {
            when.method(POST).path("/predict");
            then.status(200).body(UPSTREAM_BODY);
        })
        .await;
    let app = start_server(ml.url("/predict"), Duration::from_secs(5)).await?;
    let c = reqwest::Client::new();

    let bad_payloads = [
        json!({"past_late_count": -1, "leave_frequency": 2, "avg_delivery_time": 15.5, "rating": 4.2}),
        json!({"past_late_count": 5, "leave_frequency": 2, "avg_delivery_time": 15.5, "rating": 7.0}),
        json!({"past_late_count": 5, "leave_frequency": 2, "avg_delivery_time": 0.0, "rating": 4.2}),
        json!({"past_late_count": 5, "leave_frequency": 2, "rating": 4.2}),
    ];
    for payload in bad_payloads {
        let res = c.post(format!("{}/api/predict", app.base_url)).json(&payload).send().await?;
        assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY, "payload {payload}");
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Invalid courier feature payload.");
        assert!(body["error"].is_string());
    }
    mock.assert_hits_async(0).await;
    Ok(())
}

/// Checks the exposition format and returns `series -> value` for sample lines.
fn parse_exposition(body: &str) -> HashMap<String, u64> {
    let mut help: HashMap<String, usize> = HashMap::new();
    let mut types: HashMap<String, usize> = HashMap::new();
    let mut samples = HashMap::new();

    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        if let Some(rest) = line.strip_prefix("# HELP ") {
            let name = rest.split_whitespace().next().expect("help name");
            *help.entry(name.to_string()).or_default() += 1;
        } else if let Some(rest) = line.strip_prefix("# TYPE ") {
            let mut parts = rest.split_whitespace();
            let name = parts.next().expect("type name");
            assert_eq!(parts.next(), Some("counter"), "line {line}");
            *types.entry(name.to_string()).or_default() += 1;
        } else {
            let (series, value) = line.rsplit_once(' ').expect("sample line has a value");
            let value: u64 = value.parse().unwrap_or_else(|_| panic!("non-integer sample: {line}"));
            let (name, labels) = series.split_once('{').expect("sample line has labels");
            assert!(labels.ends_with('}') && labels.contains("=\""), "line {line}");
            assert!(help.contains_key(name), "sample before HELP: {line}");
            samples.insert(series.to_string(), value);
        }
    }
    for (name, count) in &help {
        assert_eq!(*count, 1, "HELP lines for {name}");
        assert_eq!(types.get(name), Some(&1), "TYPE lines for {name}");
    }
    samples
}

#[tokio::test]
async fn e2e_metrics_exposition_counts_requests() -> anyhow::Result<()> {
    let app = start_server("http://127.0.0.1:9/predict".into(), Duration::from_secs(1)).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/api/metrics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.headers()["content-type"].to_str()?.starts_with("text/plain"));
    let first = parse_exposition(&res.text().await?);
    let key = r#"app_requests_total{endpoint="/api/metrics"}"#;
    let before = *first.get(key).expect("metrics endpoint counted");
    assert!(before >= 1);
    assert!(first.contains_key(r#"app_requests_total{endpoint="/api/predict"}"#));

    let res = c.get(format!("{}/api/metrics", app.base_url)).send().await?;
    let second = parse_exposition(&res.text().await?);
    assert!(second[key] > before);
    Ok(())
}

#[tokio::test]
async fn e2e_couriers_are_seeded_and_readable() -> anyhow::Result<()> {
    let app = start_server("http://127.0.0.1:9/predict".into(), Duration::from_secs(1)).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/api/couriers", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(list.len(), 10);

    let id = list[0]["id"].as_str().expect("id").to_string();
    let res = c.get(format!("{}/api/couriers/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let one = res.json::<serde_json::Value>().await?;
    assert_eq!(one, list[0]);

    let res = c.get(format!("{}/api/couriers/{}", app.base_url, uuid::Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("message").is_some() && body.get("error").is_some());
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_courier_id_returns_json_error() -> anyhow::Result<()> {
    let app = start_server("http://127.0.0.1:9/predict".into(), Duration::from_secs(1)).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/api/couriers/not-a-uuid", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let ct = res.headers().get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(ct.starts_with("application/json"), "content-type was {ct}");
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Malformed request.");
    assert!(body["error"].is_string());
    Ok(())
}

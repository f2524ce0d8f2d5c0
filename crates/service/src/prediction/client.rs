use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use models::CourierFeatures;
use serde::de::IgnoredAny;
use tracing::{debug, warn};

use super::error::PredictError;

/// Upstream bodies longer than this are cut before they reach the logs.
const MAX_LOGGED_BODY: usize = 512;

/// Raw JSON body exactly as the prediction service sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBody(pub Bytes);

impl UpstreamBody {
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, features: &CourierFeatures) -> Result<UpstreamBody, PredictError>;
}

/// reqwest-backed client for the prediction service. One POST per call, no retry.
#[derive(Clone, Debug)]
pub struct HttpPredictor {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpPredictor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, url: url.into(), timeout })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> PredictError {
        if err.is_timeout() {
            PredictError::Timeout(self.timeout)
        } else {
            PredictError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, features: &CourierFeatures) -> Result<UpstreamBody, PredictError> {
        let started = Instant::now();
        let resp = self
            .client
            .post(&self.url)
            .json(features)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            truncate_at_boundary(&mut body, MAX_LOGGED_BODY);
            warn!(status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "prediction service rejected request");
            return Err(PredictError::Status { status: status.as_u16(), body });
        }

        let bytes = resp.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(|e| PredictError::Decode(e.to_string()))?;

        debug!(
            url = %self.url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prediction service answered"
        );
        Ok(UpstreamBody(bytes))
    }
}

fn truncate_at_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

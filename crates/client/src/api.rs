use async_trait::async_trait;
use models::{CourierFeatures, PredictionResult};
use thiserror::Error;
use tracing::debug;

/// Why a fetch did not produce a prediction. Shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API request failed")]
    RequestFailed { status: u16 },
    #[error("{0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn request_prediction(&self, features: &CourierFeatures) -> Result<PredictionResult, ClientError>;
}

/// Talks to the proxy's `POST /api/predict`.
#[derive(Clone, Debug)]
pub struct HttpPredictionApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let endpoint = format!("{}/api/predict", base_url.trim_end_matches('/'));
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn request_prediction(&self, features: &CourierFeatures) -> Result<PredictionResult, ClientError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "prediction request rejected");
            return Err(ClientError::RequestFailed { status: status.as_u16() });
        }

        let bytes = resp.bytes().await.map_err(|e| ClientError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

use models::{CourierFeatures, PredictionResult};
use tracing::warn;

use crate::api::PredictionApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Lifecycle of one prediction request: `idle -> loading -> success | error`.
///
/// A failed fetch keeps the previous result so the last known score stays visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub prediction_result: Option<PredictionResult>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.prediction_result.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, result: PredictionResult) {
        self.prediction_result = Some(result);
        self.loading = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Run one full request cycle against the proxy.
    pub async fn fetch_prediction<A>(&mut self, api: &A, features: &CourierFeatures) -> Phase
    where
        A: PredictionApi + ?Sized,
    {
        self.begin_fetch();
        match api.request_prediction(features).await {
            Ok(result) => self.succeed(result),
            Err(e) => {
                warn!(error = %e, "prediction fetch failed");
                self.fail(e.to_string());
            }
        }
        self.phase()
    }
}

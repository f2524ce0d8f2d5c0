use std::time::Duration;

use thiserror::Error;

/// Why a call to the prediction service did not yield a usable body.
///
/// The payloads are for logs; clients only ever see [`PredictError::client_message`].
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("ML service unreachable: {0}")]
    Unavailable(String),
    #[error("ML service did not answer within {0:?}")]
    Timeout(Duration),
    #[error("ML service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("ML service returned a malformed body: {0}")]
    Decode(String),
}

impl PredictError {
    /// Short metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            PredictError::Unavailable(_) => "unavailable",
            PredictError::Timeout(_) => "timeout",
            PredictError::Status { .. } => "status",
            PredictError::Decode(_) => "decode",
        }
    }

    /// Description safe to return to callers; no upstream body or socket detail.
    pub fn client_message(&self) -> String {
        match self {
            PredictError::Unavailable(_) => "ML service unreachable".to_string(),
            PredictError::Timeout(_) => "ML service timed out".to_string(),
            PredictError::Status { status, .. } => format!("ML service returned status {status}"),
            PredictError::Decode(_) => "ML service returned a malformed body".to_string(),
        }
    }

    pub fn all_reasons() -> [&'static str; 4] {
        ["timeout", "unavailable", "status", "decode"]
    }
}

//! Client side of the courier risk service: request a prediction through the
//! proxy, track the request lifecycle, and render the risk indicator.

pub mod api;
pub mod risk;
pub mod state;

pub use api::{ClientError, HttpPredictionApi, PredictionApi};
pub use risk::{RiskCard, RiskLevel};
pub use state::{ClientState, Phase};

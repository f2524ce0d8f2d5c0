//! Outbound calls to the external prediction service.

pub mod client;
pub mod error;

pub use client::{HttpPredictor, Predictor, UpstreamBody};
pub use error::PredictError;

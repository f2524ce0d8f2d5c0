pub mod courier;
pub mod errors;
pub mod factory;

pub use courier::{CourierFeatures, CourierRecord, PredictionResult};
pub use factory::{CourierAttributes, CourierFactory};

use std::sync::Arc;

use service::courier_store::CourierStore;
use service::prediction::Predictor;

/// Handler state. Cloned per request; everything inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub couriers: Arc<CourierStore>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, couriers: Arc<CourierStore>) -> Self {
        Self { predictor, couriers }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const MAX_RATING: f64 = 5.0;

/// Historical performance of one courier, as sent to the prediction service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourierFeatures {
    pub past_late_count: u32,
    pub leave_frequency: u32,
    /// Minutes.
    pub avg_delivery_time: f64,
    pub rating: f64,
}

impl CourierFeatures {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_delivery_time(self.avg_delivery_time)?;
        validate_rating(self.rating)?;
        Ok(())
    }
}

pub fn validate_delivery_time(minutes: f64) -> Result<(), ModelError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(ModelError::Validation(format!(
            "avg_delivery_time must be a positive number of minutes, got {minutes}"
        )));
    }
    Ok(())
}

pub fn validate_rating(rating: f64) -> Result<(), ModelError> {
    if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
        return Err(ModelError::Validation(format!(
            "rating must be within [0, {MAX_RATING}], got {rating}"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourierRecord {
    pub id: Uuid,
    pub name: String,
    pub past_late_count: u32,
    pub leave_frequency: u32,
    pub avg_delivery_time: f64,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl CourierRecord {
    pub fn features(&self) -> CourierFeatures {
        CourierFeatures {
            past_late_count: self.past_late_count,
            leave_frequency: self.leave_frequency,
            avg_delivery_time: self.avg_delivery_time,
            rating: self.rating,
        }
    }
}

/// Risk assessment returned by the prediction service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub courier_id: String,
    pub risk_score: f64,
    pub recommend_replacement: bool,
}

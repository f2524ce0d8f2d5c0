//! Courier record factory.
//!
//! Fills in any attribute the caller leaves out with plausible random data,
//! the same way seed data is produced for a fresh store.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use uuid::Uuid;

use crate::courier::CourierRecord;

pub const LATE_COUNT_RANGE: (u32, u32) = (0, 10);
pub const LEAVE_FREQUENCY_RANGE: (u32, u32) = (0, 5);
pub const DELIVERY_TIME_RANGE: (f64, f64) = (10.0, 30.0);
pub const RATING_RANGE: (f64, f64) = (3.0, 5.0);

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chen", "Dalia", "Emil", "Farah", "Goran", "Hana", "Ivo", "Jia",
    "Kenji", "Lena", "Mateo", "Nia", "Omar", "Priya", "Quinn", "Rosa", "Sven", "Tariq",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Berg", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Huang", "Ivanova", "Jensen",
    "Kowalski", "Lin", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi", "Silva", "Tanaka", "Weber",
];

/// Attribute overrides; `None` means "generate".
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CourierAttributes {
    pub name: Option<String>,
    pub past_late_count: Option<u32>,
    pub leave_frequency: Option<u32>,
    pub avg_delivery_time: Option<f64>,
    pub rating: Option<f64>,
}

pub struct CourierFactory;

impl CourierFactory {
    pub fn create(attributes: CourierAttributes) -> CourierRecord {
        Self::create_with(&mut rand::thread_rng(), attributes)
    }

    pub fn create_with<R: Rng + ?Sized>(rng: &mut R, attributes: CourierAttributes) -> CourierRecord {
        let name = attributes.name.unwrap_or_else(|| random_name(rng));
        let past_late_count = attributes
            .past_late_count
            .unwrap_or_else(|| rng.gen_range(LATE_COUNT_RANGE.0..=LATE_COUNT_RANGE.1));
        let leave_frequency = attributes
            .leave_frequency
            .unwrap_or_else(|| rng.gen_range(LEAVE_FREQUENCY_RANGE.0..=LEAVE_FREQUENCY_RANGE.1));
        let avg_delivery_time = attributes.avg_delivery_time.unwrap_or_else(|| {
            round_to(rng.gen_range(DELIVERY_TIME_RANGE.0..=DELIVERY_TIME_RANGE.1), 2)
        });
        let rating = attributes
            .rating
            .unwrap_or_else(|| round_to(rng.gen_range(RATING_RANGE.0..=RATING_RANGE.1), 1));

        CourierRecord {
            id: Uuid::new_v4(),
            name,
            past_late_count,
            leave_frequency,
            avg_delivery_time,
            rating,
            created_at: Utc::now(),
        }
    }

    pub fn create_many(count: usize) -> Vec<CourierRecord> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| Self::create_with(&mut rng, CourierAttributes::default()))
            .collect()
    }
}

fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Courier");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Unknown");
    format!("{first} {last}")
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

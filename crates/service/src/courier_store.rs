use std::path::PathBuf;
use std::sync::Arc;

use models::courier::{validate_delivery_time, validate_rating, CourierRecord};
use models::factory::{CourierAttributes, CourierFactory};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed courier records, keyed by id.
///
/// Records are only ever created; nothing here updates or deletes them.
#[derive(Clone)]
pub struct CourierStore {
    store: Arc<JsonMapStore<Uuid, CourierRecord>>,
}

impl CourierStore {
    /// Open (or create) the store at the given file path.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<Uuid, CourierRecord>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Create one record, generating any attribute left as `None`.
    pub async fn create(&self, attributes: CourierAttributes) -> Result<CourierRecord, ServiceError> {
        validate_attributes(&attributes)?;
        let record = CourierFactory::create(attributes);
        self.store.insert(record.id, record.clone()).await?;
        info!(id = %record.id, name = %record.name, "created courier");
        Ok(record)
    }

    /// Create `count` fully generated records.
    pub async fn seed(&self, count: usize) -> Result<Vec<CourierRecord>, ServiceError> {
        let records = CourierFactory::create_many(count);
        self.store
            .insert_many(records.iter().map(|r| (r.id, r.clone())))
            .await?;
        info!(count, "seeded couriers");
        Ok(records)
    }

    /// Seed only when the store holds no records. Returns how many were created.
    pub async fn seed_if_empty(&self, count: usize) -> Result<usize, ServiceError> {
        if !self.store.is_empty().await {
            return Ok(0);
        }
        Ok(self.seed(count).await?.len())
    }

    /// All records, oldest first, ties broken by name.
    pub async fn list(&self) -> Vec<CourierRecord> {
        let mut records = self.store.values().await;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        records
    }

    pub async fn get(&self, id: Uuid) -> Result<CourierRecord, ServiceError> {
        self.store.get(&id).await.ok_or_else(|| ServiceError::not_found("courier"))
    }
}

fn validate_attributes(attributes: &CourierAttributes) -> Result<(), ServiceError> {
    if let Some(name) = &attributes.name {
        if name.trim().is_empty() {
            return Err(ServiceError::Validation("name must not be blank".into()));
        }
    }
    if let Some(minutes) = attributes.avg_delivery_time {
        validate_delivery_time(minutes)?;
    }
    if let Some(rating) = attributes.rating {
        validate_rating(rating)?;
    }
    Ok(())
}

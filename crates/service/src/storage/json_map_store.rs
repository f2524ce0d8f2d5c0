use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file after every write. Readers share
/// the lock; writers hold it only while mutating the in-memory map.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if
    /// missing; an unreadable file starts empty and is overwritten on the next write.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "store file is not a valid map; starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?)
                    .await
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let data = {
            let map = self.inner.read().await;
            serde_json::to_vec_pretty(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?
        };
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Insert or replace a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.insert_many(std::iter::once((key, value))).await
    }

    /// Insert a batch with a single write to disk.
    pub async fn insert_many<I>(&self, entries: I) -> Result<(), ServiceError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = self.inner.write().await;
        map.extend(entries);
        drop(map);
        self.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_persists_across_reloads() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, u32>::new(&tmp).await?;

        assert!(store.is_empty().await);

        store.insert("a".into(), 1).await?;
        store.insert_many(vec![("b".to_string(), 2), ("c".to_string(), 3)]).await?;
        assert_eq!(store.values().await.len(), 3);
        assert_eq!(store.get(&"b".into()).await, Some(2));

        store.insert("a".into(), 10).await?;

        let reloaded = JsonMapStore::<String, u32>::new(&tmp).await?;
                assert_eq!(reloaded.get(&"a".into()).await, Some(10));
        let mut values = reloaded.values().await;
        values.sort_unstable();
        assert_eq!(values, vec![2, 3, 10]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"not json").await?;
        let store = JsonMapStore::<String, u32>::new(&tmp).await?;
        assert!(store.is_empty().await);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}

// In-memory implementation of PropertyStore.
// Nothing survives the process, which is exactly what tests want.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::core::activity::ConfigMap;
use crate::core::addon::{PropertyStore, StoreError};

pub struct InMemoryPropertyStore {
    data: DashMap<String, String>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    pub fn with_properties(properties: ConfigMap) -> Self {
        Self {
            data: properties.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn load(&self) -> Result<ConfigMap, StoreError> {
        Ok(self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }

    async fn save(&self, properties: ConfigMap) -> Result<(), StoreError> {
        // Saving replaces everything, like the settings form does.
        self.data.clear();
        for (key, value) in properties {
            self.data.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let store = InMemoryPropertyStore::with_properties(
            [("stale".to_string(), "x".to_string())].into(),
        );
        let properties: ConfigMap = [("apiUrl".to_string(), "u".to_string())].into();

        store.save(properties.clone()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), properties);
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        assert!(InMemoryPropertyStore::new().load().await.unwrap().is_empty());
    }
}

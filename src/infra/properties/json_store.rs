use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::activity::ConfigMap;
use crate::core::addon::{PropertyStore, StoreError};

/// Document properties persisted as a single JSON object.
pub struct JsonPropertyStore {
    path: PathBuf,
}

impl JsonPropertyStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl PropertyStore for JsonPropertyStore {
    async fn load(&self) -> Result<ConfigMap, StoreError> {
        if !self.path.exists() {
            return Ok(ConfigMap::new());
        }

        let text = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn save(&self, properties: ConfigMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let text = serde_json::to_string_pretty(&properties)?;
        fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonPropertyStore::new(dir.path().join("properties.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("properties.json");
        let store = JsonPropertyStore::new(&path);

        let first: ConfigMap = [
            ("apiKey".to_string(), "k".to_string()),
            ("text1".to_string(), "one".to_string()),
        ]
        .into();
        store.save(first).await.unwrap();
        let second: ConfigMap = [("text2".to_string(), "two".to_string())].into();
        store.save(second.clone()).await.unwrap();

        // Reload through a fresh store
        let reloaded = JsonPropertyStore::new(&path).load().await.unwrap();
        assert_eq!(reloaded, second);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("properties.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonPropertyStore::new(&path).load().await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}

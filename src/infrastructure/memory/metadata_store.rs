//! In-Memory Metadata Store Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{MetadataStorePort, Namespace, StorageError};

/// 内存元数据存储
pub struct InMemoryMetadataStore {
    records: DashMap<(Namespace, String), String>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStorePort for InMemoryMetadataStore {
    async fn put(&self, namespace: Namespace, id: &str, record: &str) -> Result<(), StorageError> {
        self.records
            .insert((namespace, id.to_string()), record.to_string());
        Ok(())
    }

    async fn get(&self, namespace: Namespace, id: &str) -> Result<String, StorageError> {
        self.records
            .get(&(namespace, id.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(namespace, id))
    }

    async fn delete(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        // remove 在分片锁内完成，并发删除只有一方拿到 Some
        Ok(self.records.remove(&(namespace, id.to_string())).is_some())
    }

    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        Ok(self.records.contains_key(&(namespace, id.to_string())))
    }

    async fn list(&self, namespace: Namespace) -> Result<Vec<String>, StorageError> {
        Ok(self
            .records
            .iter()
            .filter(|e| e.key().0 == namespace)
            .map(|e| e.value().clone())
            .collect())
    }
}

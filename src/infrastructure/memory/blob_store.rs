//! In-Memory Blob Store Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{BlobStorePort, BlobUsage, Namespace, StorageError};

/// 内存字节存储
pub struct InMemoryBlobStore {
    blobs: DashMap<(Namespace, String), Vec<u8>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStorePort for InMemoryBlobStore {
    async fn put(&self, namespace: Namespace, id: &str, data: &[u8]) -> Result<(), StorageError> {
        self.blobs.insert((namespace, id.to_string()), data.to_vec());
        Ok(())
    }

    async fn get(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .get(&(namespace, id.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(namespace, id))
    }

    async fn delete(&self, namespace: Namespace, id: &str) -> Result<(), StorageError> {
        self.blobs.remove(&(namespace, id.to_string()));
        Ok(())
    }

    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        Ok(self.blobs.contains_key(&(namespace, id.to_string())))
    }

    async fn usage(&self, namespace: Namespace) -> Result<BlobUsage, StorageError> {
        let mut usage = BlobUsage::default();
        for entry in self.blobs.iter().filter(|e| e.key().0 == namespace) {
            usage.count += 1;
            usage.bytes += entry.value().len() as u64;
        }
        Ok(usage)
    }
}

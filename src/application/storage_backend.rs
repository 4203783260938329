//! Storage Backend
//!
//! 在 BlobStorePort 与 MetadataStorePort 之上提供类型化的 put/get/delete/list。
//! 写入顺序约定：先字节后元数据；崩溃留下的孤儿字节是垃圾而非损坏。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::application::ports::{
    BlobStorePort, BlobUsage, MetadataStorePort, Namespace, StorageError,
};

/// 持久化存储门面
#[derive(Clone)]
pub struct StorageBackend {
    blobs: Arc<dyn BlobStorePort>,
    metadata: Arc<dyn MetadataStorePort>,
}

impl StorageBackend {
    pub fn new(blobs: Arc<dyn BlobStorePort>, metadata: Arc<dyn MetadataStorePort>) -> Self {
        Self { blobs, metadata }
    }

    pub async fn put(&self, namespace: Namespace, id: &str, data: &[u8]) -> Result<(), StorageError> {
        self.blobs.put(namespace, id, data).await
    }

    pub async fn get(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs.get(namespace, id).await
    }

    /// 幂等删除字节
    pub async fn delete(&self, namespace: Namespace, id: &str) -> Result<(), StorageError> {
        self.blobs.delete(namespace, id).await
    }

    pub async fn blob_usage(&self, namespace: Namespace) -> Result<BlobUsage, StorageError> {
        self.blobs.usage(namespace).await
    }

    pub async fn put_metadata<T: Serialize + Sync>(
        &self,
        namespace: Namespace,
        id: &str,
        record: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.metadata.put(namespace, id, &json).await
    }

    pub async fn get_metadata<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
        id: &str,
    ) -> Result<T, StorageError> {
        let json = self.metadata.get(namespace, id).await?;
        serde_json::from_str(&json).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// 删除元数据，返回本次调用是否删除了记录
    pub async fn delete_metadata(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        self.metadata.delete(namespace, id).await
    }

    pub async fn has_metadata(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        self.metadata.exists(namespace, id).await
    }

    /// 列出命名空间下的记录；无法解析的记录记日志后跳过
    pub async fn list_metadata<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
    ) -> Result<Vec<T>, StorageError> {
        let rows = self.metadata.list(namespace).await?;
        let mut records = Vec::with_capacity(rows.len());
        for json in rows {
            match serde_json::from_str(&json) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(namespace = %namespace, error = %e, "Skipping unreadable metadata record");
                }
            }
        }
        Ok(records)
    }
}

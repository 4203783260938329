//! Sled Blob Store Implementation
//!
//! key = `{namespace}:{id}`，value = bincode 序列化的 BlobEntry

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{BlobStorePort, BlobUsage, Namespace, StorageError};

/// 内部条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobEntry {
    data: Vec<u8>,
    size_bytes: u64,
    created_at: i64,
}

/// Sled 字节存储
pub struct SledBlobStore {
    db: Db,
}

impl SledBlobStore {
    /// 打开（或创建）数据库
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(db_error)?;

        tracing::info!(
            db_path = %path.as_ref().display(),
            entries = db.len(),
            "SledBlobStore initialized"
        );

        Ok(Self { db })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(db_error)?;
        Ok(())
    }

    fn key(namespace: Namespace, id: &str) -> String {
        format!("{}:{}", namespace, id)
    }
}

fn db_error(e: sled::Error) -> StorageError {
    StorageError::DatabaseError(e.to_string())
}

fn decode(bytes: &[u8]) -> Result<BlobEntry, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::SerializationError(e.to_string()))
}

#[async_trait]
impl BlobStorePort for SledBlobStore {
    async fn put(&self, namespace: Namespace, id: &str, data: &[u8]) -> Result<(), StorageError> {
        let entry = BlobEntry {
            data: data.to_vec(),
            size_bytes: data.len() as u64,
            created_at: Utc::now().timestamp(),
        };
        let bytes =
            bincode::serialize(&entry).map_err(|e| StorageError::SerializationError(e.to_string()))?;

        self.db
            .insert(Self::key(namespace, id), bytes)
            .map_err(db_error)?;
        // 写入需在重启后可见
        self.db.flush_async().await.map_err(db_error)?;

        tracing::debug!(namespace = %namespace, id = %id, size_bytes = entry.size_bytes, "Blob stored");
        Ok(())
    }

    async fn get(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, StorageError> {
        match self.db.get(Self::key(namespace, id)).map_err(db_error)? {
            Some(bytes) => Ok(decode(&bytes)?.data),
            None => Err(StorageError::not_found(namespace, id)),
        }
    }

    async fn delete(&self, namespace: Namespace, id: &str) -> Result<(), StorageError> {
        if self
            .db
            .remove(Self::key(namespace, id))
            .map_err(db_error)?
            .is_some()
        {
            self.db.flush_async().await.map_err(db_error)?;
            tracing::debug!(namespace = %namespace, id = %id, "Blob removed");
        }
        Ok(())
    }

    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        self.db
            .contains_key(Self::key(namespace, id))
            .map_err(db_error)
    }

    async fn usage(&self, namespace: Namespace) -> Result<BlobUsage, StorageError> {
        let mut usage = BlobUsage::default();
        for item in self.db.scan_prefix(format!("{}:", namespace)) {
            let (_, value) = item.map_err(db_error)?;
            usage.count += 1;
            usage.bytes += decode(&value)?.size_bytes;
        }
        Ok(usage)
    }
}

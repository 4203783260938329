//! File Blob Store - 文件系统字节存储实现
//!
//! 布局: `{root}/{namespace}/{id}.bin`，写入先落临时文件再 rename

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{BlobStorePort, BlobUsage, Namespace, StorageError};

const BLOB_EXTENSION: &str = "bin";

/// 有字节内容的命名空间；音色墓碑只写元数据
const BLOB_NAMESPACES: [Namespace; 2] = [Namespace::Voices, Namespace::Audio];

/// 文件系统字节存储
pub struct FileBlobStore {
    /// 存储根目录
    root: PathBuf,
}

impl FileBlobStore {
    /// 创建存储并确保各命名空间目录存在
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();

        for namespace in BLOB_NAMESPACES {
            fs::create_dir_all(root.join(namespace.as_str()))
                .await
                .map_err(io_error)?;
        }

        tracing::info!(root = %root.display(), "FileBlobStore initialized");
        Ok(Self { root })
    }

    /// 获取存储根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, namespace: Namespace, id: &str) -> Result<PathBuf, StorageError> {
        // ID 不能逃出命名空间目录
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(StorageError::not_found(namespace, id));
        }
        Ok(self
            .root
            .join(namespace.as_str())
            .join(format!("{}.{}", id, BLOB_EXTENSION)))
    }
}

fn io_error(e: std::io::Error) -> StorageError {
    StorageError::IoError(e.to_string())
}

#[async_trait]
impl BlobStorePort for FileBlobStore {
    async fn put(&self, namespace: Namespace, id: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.blob_path(namespace, id)?;
        let tmp = path.with_extension("tmp");

        fs::write(&tmp, data).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)?;

        tracing::debug!(
            namespace = %namespace,
            id = %id,
            size_bytes = data.len(),
            "Blob written"
        );
        Ok(())
    }

    async fn get(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(namespace, id)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(namespace, id)),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn delete(&self, namespace: Namespace, id: &str) -> Result<(), StorageError> {
        let path = match self.blob_path(namespace, id) {
            Ok(path) => path,
            Err(_) => return Ok(()),
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(namespace = %namespace, id = %id, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        match self.blob_path(namespace, id) {
            Ok(path) => fs::try_exists(&path).await.map_err(io_error),
            Err(_) => Ok(false),
        }
    }

    async fn usage(&self, namespace: Namespace) -> Result<BlobUsage, StorageError> {
        let mut usage = BlobUsage::default();
        let mut entries = match fs::read_dir(self.root.join(namespace.as_str())).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(usage),
            Err(e) => return Err(io_error(e)),
        };

        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            if entry
                .path()
                .extension()
                .map_or(false, |ext| ext == BLOB_EXTENSION)
            {
                usage.count += 1;
                if let Ok(metadata) = entry.metadata().await {
                    usage.bytes += metadata.len();
                }
            }
        }
        Ok(usage)
    }
}

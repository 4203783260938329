//! Storage Ports - 出站端口
//!
//! 字节存储与元数据存储的抽象接口。
//! 两者之间没有事务：调用方先写字节再写元数据，元数据是存在性的唯一依据。

use async_trait::async_trait;
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Entry not found: {namespace}/{id}")]
    NotFound { namespace: &'static str, id: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StorageError {
    pub fn not_found(namespace: Namespace, id: &str) -> Self {
        Self::NotFound {
            namespace: namespace.as_str(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// 逻辑命名空间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// 音色参考音频 + 音色元数据
    Voices,
    /// 已删除音色 ID 的墓碑记录
    VoiceTombstones,
    /// 生成音频 + AudioRecord
    Audio,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Voices => "voices",
            Namespace::VoiceTombstones => "voice_tombstones",
            Namespace::Audio => "audio",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 命名空间用量统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobUsage {
    pub count: u64,
    pub bytes: u64,
}

/// Blob Store Port
///
/// 以 (namespace, id) 为键的持久化字节存储
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// 写入字节（覆盖同 key）
    async fn put(&self, namespace: Namespace, id: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 读取字节，不存在时返回 NotFound
    async fn get(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, StorageError>;

    /// 删除字节，幂等
    async fn delete(&self, namespace: Namespace, id: &str) -> Result<(), StorageError>;

    /// 检查是否存在
    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError>;

    /// 命名空间用量
    async fn usage(&self, namespace: Namespace) -> Result<BlobUsage, StorageError>;
}

/// Metadata Store Port
///
/// 以 (namespace, id) 为键的持久化记录存储，记录为 JSON 文本
#[async_trait]
pub trait MetadataStorePort: Send + Sync {
    /// 写入记录（覆盖同 key）
    async fn put(&self, namespace: Namespace, id: &str, record: &str) -> Result<(), StorageError>;

    /// 读取记录，不存在时返回 NotFound
    async fn get(&self, namespace: Namespace, id: &str) -> Result<String, StorageError>;

    /// 删除记录，返回是否确实删除了一条
    ///
    /// 并发删除同一 key 时只有一个调用方得到 true
    async fn delete(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError>;

    /// 检查是否存在
    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError>;

    /// 列出命名空间下所有记录，不保证顺序
    async fn list(&self, namespace: Namespace) -> Result<Vec<String>, StorageError>;
}

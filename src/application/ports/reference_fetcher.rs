//! Reference Fetcher Port - 远程参考音频下载

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP status {0}")]
    Status(u16),
}

/// Reference Fetcher Port
#[async_trait]
pub trait ReferenceFetcherPort: Send + Sync {
    /// 下载 URL 指向的音频字节
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

//! HTTP Reference Fetcher - 下载内置音色的远程参考音频

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{FetchError, ReferenceFetcherPort};

/// 基于 reqwest 的下载器
pub struct HttpReferenceFetcher {
    client: Client,
}

impl HttpReferenceFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReferenceFetcherPort for HttpReferenceFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url = %url, "Downloading reference audio");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

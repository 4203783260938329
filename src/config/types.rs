//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 生成音频保留策略
    #[serde(default)]
    pub retention: RetentionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体最大大小（字节），默认 50MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_size() -> usize {
    50 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 引擎实现选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsEngineKind {
    /// 远程推理服务
    #[default]
    Http,
    /// 本地正弦波，开发和演示用
    Fake,
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub engine: TtsEngineKind,

    /// 推理服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 健康检查上报的计算设备
    #[serde(default = "default_device")]
    pub device: String,

    /// 等待引擎门的最长时间（秒），0 表示一直等待
    #[serde(default)]
    pub queue_timeout_secs: u64,

    #[serde(default = "default_fake_sample_rate")]
    pub fake_sample_rate: u32,

    #[serde(default = "default_fake_delay_ms")]
    pub fake_delay_ms: u64,
}

fn default_tts_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_device() -> String {
    "cuda".to_string()
}

fn default_fake_sample_rate() -> u32 {
    24000
}

fn default_fake_delay_ms() -> u64 {
    200
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            engine: TtsEngineKind::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            device: default_device(),
            queue_timeout_secs: 0,
            fake_sample_rate: default_fake_sample_rate(),
            fake_delay_ms: default_fake_delay_ms(),
        }
    }
}

impl TtsConfig {
    pub fn queue_timeout(&self) -> Option<Duration> {
        (self.queue_timeout_secs > 0).then(|| Duration::from_secs(self.queue_timeout_secs))
    }
}

/// 字节存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// 每个 blob 一个文件
    #[default]
    File,
    /// Sled 嵌入式数据库
    Sled,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 数据根目录
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    #[serde(default)]
    pub blob_backend: BlobBackend,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            blob_backend: BlobBackend::default(),
        }
    }
}

impl StorageConfig {
    pub fn blobs_dir(&self) -> PathBuf {
        self.root.join("blobs")
    }

    pub fn sled_path(&self) -> PathBuf {
        self.root.join("blobs.sled")
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/echovox.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 保留策略配置
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,

    /// 清理间隔（秒）
    #[serde(default = "default_retention_interval")]
    pub interval_secs: u64,

    /// 最长保留时间（秒），0 表示不限
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// 最多保留条数，0 表示不限
    #[serde(default)]
    pub max_records: usize,
}

fn default_retention_enabled() -> bool {
    true
}

fn default_retention_interval() -> u64 {
    3600 // 1 小时
}

fn default_max_age() -> u64 {
    7 * 86400 // 7 天
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            interval_secs: default_retention_interval(),
            max_age_secs: default_max_age(),
            max_records: 0,
        }
    }
}

impl RetentionConfig {
    pub fn max_age(&self) -> Option<Duration> {
        (self.max_age_secs > 0).then(|| Duration::from_secs(self.max_age_secs))
    }

    pub fn max_records(&self) -> Option<usize> {
        (self.max_records > 0).then_some(self.max_records)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:8000");
        assert_eq!(config.tts.engine, TtsEngineKind::Http);
        assert_eq!(config.storage.blob_backend, BlobBackend::File);
        assert_eq!(config.database.path, "data/echovox.db");
    }

    #[test]
    fn test_zero_means_unbounded() {
        let mut config = AppConfig::default();
        assert_eq!(config.tts.queue_timeout(), None);
        assert_eq!(config.retention.max_records(), None);

        config.retention.max_age_secs = 0;
        config.retention.max_records = 100;
        config.tts.queue_timeout_secs = 30;
        assert_eq!(config.retention.max_age(), None);
        assert_eq!(config.retention.max_records(), Some(100));
        assert_eq!(config.tts.queue_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_storage_paths() {
        let config = StorageConfig::default();
        assert_eq!(config.blobs_dir(), PathBuf::from("data/blobs"));
        assert_eq!(config.sled_path(), PathBuf::from("data/blobs.sled"));
    }
}

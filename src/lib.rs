//! Echovox - 声音克隆 TTS 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 内置与自定义音色
//! - Audio Context: 生成音频记录
//! - Synthesis: 合成文本与引擎参数
//!
//! 应用层 (application/):
//! - Ports: 端口定义（BlobStore, MetadataStore, TtsEngine, AudioCodec, ReferenceFetcher）
//! - StorageBackend: 字节 + 元数据存储门面
//! - EngineGate: 引擎互斥门
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 元数据 + Sled 字节
//! - Adapters: 文件存储、TTS Client、音频编解码、参考音频下载
//! - Memory: 测试用内存存储
//! - Worker: RetentionWorker 定期清理生成音频

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

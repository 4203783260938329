//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（BlobStore、MetadataStore、TtsEngine、AudioCodec、ReferenceFetcher）
//! - storage_backend: 字节 + 元数据存储门面
//! - engine_gate: 引擎互斥门
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod engine_gate;
pub mod error;
pub mod ports;
pub mod queries;
pub mod storage_backend;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use commands::{
    handlers::{
        CreateVoiceHandler, DeleteAudioHandler, DeleteVoiceHandler, PurgeAudioHandler,
        SynthesizeHandler, MAX_REFERENCE_SECS, MIN_REFERENCE_SECS,
    },
    CreateVoice, DeleteAudio, DeleteVoice, PurgeAudio, PurgeResult, Synthesize,
    SynthesizeResponse,
};

pub use engine_gate::{EngineGate, GateError};
pub use error::{ApplicationError, InvalidAudioReason};
pub use storage_backend::StorageBackend;

pub use queries::{
    handlers::{
        AudioList, GetAudioHandler, GetAudioInfoHandler, GetHealthHandler, GetVoiceHandler,
        ListAudioHandler, ListVoicesHandler, VoiceList,
    },
    GetAudio, GetAudioInfo, GetAudioResponse, GetHealth, GetVoice, HealthReport, ListAudio,
    ListVoices,
};

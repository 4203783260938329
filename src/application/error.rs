//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{CodecError, StorageError, TtsError};
use crate::domain::synthesis::InvalidParameter;
use crate::domain::voice::VoiceError;

/// 上传音频被拒绝的原因
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidAudioReason {
    #[error("audio file is empty")]
    Empty,

    #[error("unsupported audio format: {0} (expected WAV, MP3 or FLAC)")]
    UnsupportedFormat(String),

    #[error("audio could not be decoded: {0}")]
    Undecodable(String),

    #[error("audio duration {seconds:.2}s is outside the allowed range {min}-{max}s")]
    Duration { seconds: f64, min: f64, max: f64 },
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 输入格式或范围错误，调用方可修正
    #[error("Validation error on `{field}`: {message}")]
    ValidationError { field: &'static str, message: String },

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 试图修改内置音色
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 上传音频未通过格式/时长检查
    #[error("Invalid audio: {0}")]
    InvalidAudio(InvalidAudioReason),

    /// 引擎在输入校验通过后失败，未生成任何音频
    #[error("Synthesis failed: {0}")]
    SynthesisError(String),

    /// 等待引擎超时，未获得引擎
    #[error("Engine busy: gave up after waiting {waited_ms} ms")]
    EngineBusy { waited_ms: u64 },

    /// 引擎尚未加载，稍后重试
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// 持久化存储不可用
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field,
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<InvalidParameter> for ApplicationError {
    fn from(err: InvalidParameter) -> Self {
        Self::ValidationError {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidId(id) => Self::validation("voice_id", format!("invalid voice id: {}", id)),
            VoiceError::InvalidName(msg) => Self::validation("name", msg),
        }
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::NotLoaded => Self::EngineUnavailable(TtsError::NotLoaded.to_string()),
            other => Self::SynthesisError(other.to_string()),
        }
    }
}

impl From<CodecError> for ApplicationError {
    fn from(err: CodecError) -> Self {
        Self::InternalError(err.to_string())
    }
}

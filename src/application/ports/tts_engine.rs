//! TTS Engine Port - TTS 推理引擎抽象
//!
//! 引擎是有状态的单例资源，不允许并发调用；串行化由 EngineGate 保证

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::synthesis::SynthesisParams;
use crate::domain::voice::AudioFormat;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Engine not loaded")]
    NotLoaded,
}

/// 条件参考音频
#[derive(Debug, Clone)]
pub struct ReferenceAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// TTS 推理请求
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 参考音频；None 表示使用引擎内置默认
    pub reference: Option<ReferenceAudio>,
    /// 可调参数
    pub params: SynthesisParams,
    /// 音色 ID（用于日志和追踪）
    pub voice_id: String,
}

/// 单声道波形
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    /// 时长（秒）
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// TTS Engine Port
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行一次合成
    async fn synthesize(&self, request: EngineRequest) -> Result<Waveform, TtsError>;

    /// 引擎是否已加载可用
    async fn health_check(&self) -> bool {
        true
    }

    /// 当前计算设备（cpu / cuda / remote 等）
    fn device(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_duration() {
        let waveform = Waveform {
            samples: vec![0.0; 48000],
            sample_rate: 24000,
        };
        assert_eq!(waveform.duration_secs(), 2.0);

        let empty = Waveform {
            samples: vec![],
            sample_rate: 0,
        };
        assert_eq!(empty.duration_secs(), 0.0);
    }
}

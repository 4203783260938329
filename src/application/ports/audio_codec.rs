//! Audio Codec Port - 音频探测与编解码抽象

use thiserror::Error;

use super::Waveform;
use crate::domain::voice::AudioFormat;

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// 音频信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub channels: u8,
    /// 时长（秒）
    pub duration_secs: f64,
}

/// Audio Codec Port
///
/// 同步接口，CPU 密集，调用方应放在 spawn_blocking 中执行
pub trait AudioCodecPort: Send + Sync {
    /// 探测音频格式、采样率与时长
    fn inspect(&self, data: &[u8], format: AudioFormat) -> Result<AudioInfo, CodecError>;

    /// 解码为单声道波形
    fn decode(&self, data: &[u8], format: AudioFormat) -> Result<Waveform, CodecError>;

    /// 编码为 16-bit PCM WAV
    fn encode_wav(&self, waveform: &Waveform) -> Result<Vec<u8>, CodecError>;
}

//! Audio Context - AudioRecord

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::voice::{Voice, VoiceId};

/// 摘要中文本预览的最大字符数
const TEXT_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Error)]
#[error("invalid audio id: {0}")]
pub struct InvalidAudioId(pub String);

/// 生成音频唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioId(Uuid);

impl AudioId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(id: &str) -> Result<Self, InvalidAudioId> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| InvalidAudioId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AudioId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AudioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一次合成结果的元数据快照
///
/// 不变量:
/// - 创建后不再更新，波形字节不可变
/// - voice_name 是生成时的快照，音色删除后仍然有效
/// - voice_id 可能悬空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRecord {
    pub audio_id: AudioId,
    pub text: String,
    pub voice_id: VoiceId,
    pub voice_name: String,
    pub sample_rate: u32,
    /// 时长（秒）
    pub duration: f64,
    pub generated_at: DateTime<Utc>,
    /// 引擎调用耗时（秒）
    pub generation_time: f64,
    pub content_type: String,
    pub size_bytes: u64,
}

impl AudioRecord {
    pub fn new(
        audio_id: AudioId,
        text: String,
        voice: &Voice,
        sample_rate: u32,
        duration: f64,
        generation_time: f64,
        size_bytes: u64,
    ) -> Self {
        Self {
            audio_id,
            text,
            voice_id: voice.id().clone(),
            voice_name: voice.name().to_string(),
            sample_rate,
            duration,
            generated_at: Utc::now(),
            generation_time,
            content_type: "audio/wav".to_string(),
            size_bytes,
        }
    }

    pub fn summary(&self) -> AudioSummary {
        AudioSummary {
            audio_id: self.audio_id,
            text: preview_text(&self.text),
            voice_name: self.voice_name.clone(),
            duration: self.duration,
            generated_at: self.generated_at,
        }
    }
}

/// 列表用摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioSummary {
    pub audio_id: AudioId,
    pub text: String,
    pub voice_name: String,
    pub duration: f64,
    pub generated_at: DateTime<Utc>,
}

fn preview_text(text: &str) -> String {
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let head: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{AudioFormat, VoiceName};

    fn voice() -> Voice {
        Voice::custom(
            VoiceId::generate(),
            VoiceName::new("Test").unwrap(),
            String::new(),
            AudioFormat::Wav,
            16000,
            10.0,
        )
    }

    #[test]
    fn test_summary_truncates_long_text() {
        let text = "a".repeat(80);
        let record = AudioRecord::new(AudioId::new(), text, &voice(), 24000, 1.0, 0.1, 10);
        let summary = record.summary();
        assert_eq!(summary.text.chars().count(), 53);
        assert!(summary.text.ends_with("..."));
    }

    #[test]
    fn test_summary_keeps_short_text() {
        let record =
            AudioRecord::new(AudioId::new(), "你好".to_string(), &voice(), 24000, 1.0, 0.1, 10);
        assert_eq!(record.summary().text, "你好");
        assert_eq!(record.voice_name, "Test");
    }

    #[test]
    fn test_parse_audio_id() {
        let id = AudioId::new();
        assert_eq!(AudioId::parse(&id.to_string()).unwrap(), id);
        assert!(AudioId::parse("nonexistent").is_err());
    }
}

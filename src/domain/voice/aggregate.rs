//! Voice Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AudioFormat, ReferenceSource, VoiceId, VoiceKind, VoiceName};

/// Voice 聚合根
///
/// 不变量:
/// - voice_id 创建后不可变，删除后不会被复用
/// - 创建后只读，没有更新操作
/// - builtin 音色不可删除、不可覆盖
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    id: VoiceId,
    name: VoiceName,
    description: String,
    kind: VoiceKind,
    reference: ReferenceSource,
    audio_duration: Option<f64>,
    created_at: DateTime<Utc>,
}

impl Voice {
    /// 从已校验的上传音频创建自定义音色
    pub fn custom(
        id: VoiceId,
        name: VoiceName,
        description: String,
        format: AudioFormat,
        sample_rate: u32,
        audio_duration: f64,
    ) -> Self {
        Self {
            id,
            name,
            description,
            kind: VoiceKind::Custom,
            reference: ReferenceSource::Stored {
                format,
                sample_rate,
            },
            audio_duration: Some(audio_duration),
            created_at: Utc::now(),
        }
    }

    pub(crate) fn builtin(
        id: VoiceId,
        name: VoiceName,
        description: &str,
        reference: ReferenceSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description: description.to_string(),
            kind: VoiceKind::Builtin,
            reference,
            audio_duration: None,
            created_at,
        }
    }

    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn name(&self) -> &VoiceName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> VoiceKind {
        self.kind
    }

    pub fn is_builtin(&self) -> bool {
        self.kind == VoiceKind::Builtin
    }

    pub fn reference(&self) -> &ReferenceSource {
        &self.reference
    }

    pub fn audio_duration(&self) -> Option<f64> {
        self.audio_duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_voice_creation() {
        let voice = Voice::custom(
            VoiceId::generate(),
            VoiceName::new("测试音色").unwrap(),
            "Custom voice".to_string(),
            AudioFormat::Wav,
            24000,
            10.0,
        );

        assert_eq!(voice.name().as_str(), "测试音色");
        assert_eq!(voice.kind(), VoiceKind::Custom);
        assert!(!voice.is_builtin());
        assert_eq!(voice.audio_duration(), Some(10.0));
        assert!(matches!(
            voice.reference(),
            ReferenceSource::Stored { format: AudioFormat::Wav, sample_rate: 24000 }
        ));
    }

    #[test]
    fn test_serde_keeps_kind_lowercase() {
        let voice = Voice::custom(
            VoiceId::generate(),
            VoiceName::new("Test").unwrap(),
            String::new(),
            AudioFormat::Flac,
            16000,
            6.5,
        );
        let json = serde_json::to_value(&voice).unwrap();
        assert_eq!(json["kind"], "custom");

        let back: Voice = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), voice.id());
    }
}

//! Built-in voice table
//!
//! 进程启动时构建一次，之后只读；不持久化，也不会被删除

use chrono::{DateTime, TimeZone, Utc};

use super::{ReferenceSource, Voice, VoiceId, VoiceName};

struct BuiltinSpec {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    reference_url: Option<&'static str>,
}

const BUILTIN_SPECS: &[BuiltinSpec] = &[
    BuiltinSpec {
        id: "female_default",
        name: "Female Default",
        description: "Professional female voice",
        reference_url: Some(
            "https://storage.googleapis.com/chatterbox-demo-samples/prompts/female_shadowheart4.flac",
        ),
    },
    BuiltinSpec {
        id: "male_professional",
        name: "Male Professional",
        description: "Confident male voice",
        reference_url: Some(
            "https://storage.googleapis.com/chatterbox-demo-samples/prompts/male_professional.flac",
        ),
    },
];

/// 默认音色 ID（合成请求未指定 voice_id 时使用）
pub const DEFAULT_VOICE_ID: &str = "female_default";

fn builtin_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// 内置音色表，顺序固定
#[derive(Debug, Clone)]
pub struct BuiltinVoices {
    voices: Vec<Voice>,
}

impl BuiltinVoices {
    /// 标准内置音色
    pub fn standard() -> Self {
        let created_at = builtin_created_at();
        let voices = BUILTIN_SPECS
            .iter()
            .filter_map(|spec| {
                let name = VoiceName::new(spec.name).ok()?;
                let reference = match spec.reference_url {
                    Some(url) => ReferenceSource::Remote {
                        url: url.to_string(),
                    },
                    None => ReferenceSource::EngineDefault,
                };
                Some(Voice::builtin(
                    VoiceId::from_static(spec.id),
                    name,
                    spec.description,
                    reference,
                    created_at,
                ))
            })
            .collect();
        Self { voices }
    }

    /// 自定义内置音色表
    pub fn from_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices: voices.into_iter().filter(|v| v.is_builtin()).collect(),
        }
    }

    pub fn get(&self, id: &VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id() == id)
    }

    pub fn contains(&self, id: &VoiceId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl Default for BuiltinVoices {
    fn default() -> Self {
        Self::standard()
    }
}

/// 构建一个使用引擎默认条件音频的内置音色（无需下载）
pub fn engine_default_voice(id: &'static str, name: &'static str, description: &str) -> Option<Voice> {
    Some(Voice::builtin(
        VoiceId::from_static(id),
        VoiceName::new(name).ok()?,
        description,
        ReferenceSource::EngineDefault,
        builtin_created_at(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order_is_fixed() {
        let builtins = BuiltinVoices::standard();
        let ids: Vec<&str> = builtins.iter().map(|v| v.id().as_str()).collect();
        assert_eq!(ids, vec!["female_default", "male_professional"]);
        assert!(builtins.iter().all(|v| v.is_builtin()));
    }

    #[test]
    fn test_default_voice_is_builtin() {
        let builtins = BuiltinVoices::standard();
        let id = VoiceId::parse(DEFAULT_VOICE_ID).unwrap();
        assert!(builtins.contains(&id));
    }

    #[test]
    fn test_engine_default_voice() {
        let voice = engine_default_voice("plain", "Plain", "no reference").unwrap();
        assert_eq!(voice.reference(), &ReferenceSource::EngineDefault);
        let table = BuiltinVoices::from_voices(vec![voice]);
        assert_eq!(table.len(), 1);
    }
}

//! Voice Context - Value Objects

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::VoiceError;

/// 音色 ID 最大长度
const MAX_VOICE_ID_LEN: usize = 128;

/// 音色唯一标识
///
/// 自定义音色格式: `voice_{unix 秒}_{8 位十六进制}`，内置音色使用固定 slug。
/// 只允许 URL 安全字符 `[A-Za-z0-9_-]`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    /// 生成新的自定义音色 ID（时间可排序 + 随机后缀）
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("voice_{}_{}", Utc::now().timestamp(), &suffix[..8]))
    }

    /// 解析外部传入的 ID
    pub fn parse(id: impl Into<String>) -> Result<Self, VoiceError> {
        let id = id.into();
        if id.is_empty() || id.len() > MAX_VOICE_ID_LEN {
            return Err(VoiceError::InvalidId(id));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VoiceError::InvalidId(id));
        }
        Ok(Self(id))
    }

    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, VoiceError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(VoiceError::InvalidName("voice name cannot be empty".to_string()));
        }
        if name.chars().count() > 100 {
            return Err(VoiceError::InvalidName(
                "voice name cannot exceed 100 characters".to_string(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceKind {
    Builtin,
    Custom,
}

impl VoiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceKind::Builtin => "builtin",
            VoiceKind::Custom => "custom",
        }
    }
}

/// 参考音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" | "wave" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// 从文件名推断格式
    pub fn from_filename(filename: &str) -> Option<Self> {
        std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// 根据文件头魔数识别格式
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
            return Some(Self::Wav);
        }
        if data.len() >= 4 && &data[0..4] == b"fLaC" {
            return Some(Self::Flac);
        }
        if data.len() >= 3 && &data[0..3] == b"ID3" {
            return Some(Self::Mp3);
        }
        // MPEG 帧同步字
        if data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0 {
            return Some(Self::Mp3);
        }
        None
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
        }
    }
}

/// 参考音频来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReferenceSource {
    /// 字节存储在 Storage Backend 的 voices 命名空间，key = voice_id
    Stored { format: AudioFormat, sample_rate: u32 },
    /// 远程 URL，首次使用时下载
    Remote { url: String },
    /// 使用引擎内置的默认条件音频
    EngineDefault,
}

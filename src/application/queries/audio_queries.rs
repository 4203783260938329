//! Audio Queries - 生成音频查询

/// 获取音频字节
#[derive(Debug, Clone)]
pub struct GetAudio {
    pub audio_id: String,
}

/// 获取音频字节响应
#[derive(Debug, Clone)]
pub struct GetAudioResponse {
    pub audio_data: Vec<u8>,
    pub content_type: String,
}

/// 获取音频元数据
#[derive(Debug, Clone)]
pub struct GetAudioInfo {
    pub audio_id: String,
}

/// 列出生成音频（最新在前）
#[derive(Debug, Clone)]
pub struct ListAudio;

//! Audio Commands - 生成音频的删除与保留策略

use std::time::Duration;

/// 删除单个生成音频
#[derive(Debug, Clone)]
pub struct DeleteAudio {
    pub audio_id: String,
}

/// 按保留策略清理生成音频
#[derive(Debug, Clone, Default)]
pub struct PurgeAudio {
    /// 超过该时长的记录被删除
    pub max_age: Option<Duration>,
    /// 最多保留的记录数（保留最新的）
    pub max_records: Option<usize>,
}

/// 清理结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeResult {
    pub deleted: usize,
    pub freed_bytes: u64,
}

//! Audio Context - 生成音频限界上下文
//!
//! 职责:
//! - 生成音频的标识与元数据快照
//! - 列表摘要

mod record;

pub use record::{AudioId, AudioRecord, AudioSummary, InvalidAudioId};

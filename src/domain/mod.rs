//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Voice Context: 音色管理
//! - Audio Context: 生成音频记录
//! - Synthesis Context: 合成请求校验

pub mod audio;
pub mod synthesis;
pub mod voice;

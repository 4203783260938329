//! Synthesis Commands

use crate::domain::audio::AudioRecord;
use crate::domain::synthesis::SynthesisParams;

/// 合成命令
#[derive(Debug, Clone)]
pub struct Synthesize {
    pub text: String,
    pub voice_id: String,
    pub params: SynthesisParams,
}

/// 合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    pub record: AudioRecord,
    pub message: String,
}

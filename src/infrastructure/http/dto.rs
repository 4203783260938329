//! Data Transfer Objects
//!
//! 成功响应直接返回业务对象，错误响应使用 `error::ErrorResponse` 信封

use serde::{Deserialize, Serialize};

use crate::application::{HealthReport, VoiceList};
use crate::domain::audio::{AudioRecord, AudioSummary};
use crate::domain::synthesis::SynthesisParams;
use crate::domain::voice::{Voice, DEFAULT_VOICE_ID};

// ============================================================================
// Status DTOs
// ============================================================================

/// 服务状态 (GET /)
#[derive(Debug, Serialize)]
pub struct ServiceStatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub model_loaded: bool,
    pub device: String,
    pub voices_available: usize,
    pub endpoints: Vec<&'static str>,
}

/// 健康检查 (GET /health)
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub device: String,
    pub voices_total: usize,
    pub queue_depth: usize,
    pub engine_busy: bool,
    /// Unix 时间戳（秒）
    pub timestamp: f64,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: if report.model_loaded {
                "healthy"
            } else {
                "unhealthy"
            },
            model_loaded: report.model_loaded,
            device: report.device,
            voices_total: report.voices_total,
            queue_depth: report.queue_depth,
            engine_busy: report.engine_busy,
            timestamp: report.checked_at.timestamp_millis() as f64 / 1000.0,
        }
    }
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceDto {
    pub voice_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub created_at: String,
    pub audio_duration: Option<f64>,
}

impl From<&Voice> for VoiceDto {
    fn from(voice: &Voice) -> Self {
        Self {
            voice_id: voice.id().as_str().to_string(),
            name: voice.name().as_str().to_string(),
            description: voice.description().to_string(),
            kind: voice.kind().as_str(),
            created_at: voice.created_at().to_rfc3339(),
            audio_duration: voice.audio_duration(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceDto>,
    pub total: usize,
    pub builtin: usize,
    pub custom: usize,
}

impl From<VoiceList> for VoiceListResponse {
    fn from(list: VoiceList) -> Self {
        Self {
            voices: list.voices.iter().map(VoiceDto::from).collect(),
            total: list.total,
            builtin: list.builtin,
            custom: list.custom,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateVoiceResponse {
    pub success: bool,
    pub voice_id: String,
    pub message: String,
    pub voice_info: VoiceDto,
}

/// 删除类操作的通用响应
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ============================================================================
// Synthesis DTOs
// ============================================================================

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    pub exaggeration: Option<f32>,
    pub temperature: Option<f32>,
    pub cfg_weight: Option<f32>,
    /// 0 表示不指定；负数原样转发给引擎
    pub seed: Option<i64>,
}

impl SynthesizeRequest {
    /// 缺省字段使用引擎默认值
    pub fn params(&self) -> SynthesisParams {
        let defaults = SynthesisParams::default();
        SynthesisParams {
            exaggeration: self.exaggeration.unwrap_or(defaults.exaggeration),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            cfg_weight: self.cfg_weight.unwrap_or(defaults.cfg_weight),
            seed: self.seed.unwrap_or(defaults.seed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponseDto {
    pub success: bool,
    pub audio_id: String,
    pub message: String,
    pub sample_rate: u32,
    pub duration: f64,
}

impl SynthesizeResponseDto {
    pub fn new(record: &AudioRecord, message: String) -> Self {
        Self {
            success: true,
            audio_id: record.audio_id.to_string(),
            message,
            sample_rate: record.sample_rate,
            duration: record.duration,
        }
    }
}

// ============================================================================
// Audio DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AudioListResponse {
    pub audio_files: Vec<AudioSummary>,
    pub total: usize,
}

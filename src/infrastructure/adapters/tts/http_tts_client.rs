//! HTTP TTS Client - 调用外部 TTS 推理服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部推理服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/synthesize
//! Request: multipart (text, exaggeration, temperature, cfg_weight, seed?, reference_audio?)
//! Response: audio/wav binary, sample rate in `X-TTS-Sample-Rate`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AudioCodecPort, EngineRequest, TtsEnginePort, TtsError, Waveform};
use crate::domain::voice::AudioFormat;

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 推理服务使用的设备，仅用于状态上报
    pub device: String,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            device: "cuda".to_string(),
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
    codec: Arc<dyn AudioCodecPort>,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端，codec 用于把返回的 WAV 解码为波形
    pub fn new(config: HttpTtsClientConfig, codec: Arc<dyn AudioCodecPort>) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            codec,
        })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/api/tts/synthesize", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }

    fn build_form(request: &EngineRequest) -> Result<Form, TtsError> {
        let params = &request.params;
        let mut form = Form::new()
            .text("text", request.text.clone())
            .text("exaggeration", params.exaggeration.to_string())
            .text("temperature", params.temperature.to_string())
            .text("cfg_weight", params.cfg_weight.to_string());

        if let Some(seed) = params.explicit_seed() {
            form = form.text("seed", seed.to_string());
        }

        if let Some(reference) = &request.reference {
            let part = Part::bytes(reference.data.clone())
                .file_name(format!("reference.{}", reference.format.extension()))
                .mime_str(reference.format.mime_type())
                .map_err(|e| TtsError::NetworkError(e.to_string()))?;
            form = form.part("reference_audio", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: EngineRequest) -> Result<Waveform, TtsError> {
        let form = Self::build_form(&request)?;

        tracing::debug!(
            url = %self.synthesize_url(),
            text_chars = request.text.chars().count(),
            voice_id = %request.voice_id,
            has_reference = request.reference.is_some(),
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text));
        }

        let reported_rate: Option<u32> = response
            .headers()
            .get("X-TTS-Sample-Rate")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        let format = AudioFormat::sniff(&audio_data).unwrap_or(AudioFormat::Wav);
        let codec = self.codec.clone();
        let waveform = tokio::task::spawn_blocking(move || codec.decode(&audio_data, format))
            .await
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?;

        if let Some(rate) = reported_rate.filter(|rate| *rate != waveform.sample_rate) {
            tracing::warn!(
                header_rate = rate,
                decoded_rate = waveform.sample_rate,
                "Sample rate header disagrees with audio, trusting audio"
            );
        }

        tracing::info!(
            voice_id = %request.voice_id,
            sample_rate = waveform.sample_rate,
            duration_secs = waveform.duration_secs(),
            "TTS inference completed"
        );

        Ok(waveform)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn device(&self) -> &str {
        &self.config.device
    }
}

/// 推理服务以 503 表示模型尚未加载
fn status_error(status: reqwest::StatusCode, body: &str) -> TtsError {
    if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
        tracing::warn!(body = %body, "TTS service reports model not loaded");
        return TtsError::NotLoaded;
    }
    TtsError::ServiceError(format!("HTTP {}: {}", status, body))
}

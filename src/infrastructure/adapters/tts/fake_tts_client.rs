//! Fake TTS Client - 本地开发与测试用的引擎
//!
//! 不加载模型，按文本长度生成确定性的正弦波

use async_trait::async_trait;
use std::f32::consts::PI;
use std::time::Duration;

use crate::application::ports::{EngineRequest, TtsEnginePort, TtsError, Waveform};

/// 每个字符对应的时长（秒）
const SECS_PER_CHAR: f32 = 0.06;
const MIN_SECS: f32 = 0.5;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 模拟推理延迟
    pub delay: Duration,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            delay: Duration::from_millis(200),
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            delay_ms = config.delay.as_millis() as u64,
            "FakeTtsClient initialized"
        );
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    fn render(&self, request: &EngineRequest) -> Waveform {
        let sample_rate = self.config.sample_rate;
        let secs = (request.text.chars().count() as f32 * SECS_PER_CHAR).max(MIN_SECS);
        let count = (secs * sample_rate as f32) as usize;
        // 有参考音频时音高更低，便于听出区别
        let frequency = if request.reference.is_some() { 180.0 } else { 220.0 };
        let gain = 0.3 * request.params.exaggeration.min(1.0);

        let samples = (0..count)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin() * gain)
            .collect();
        Waveform {
            samples,
            sample_rate,
        }
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: EngineRequest) -> Result<Waveform, TtsError> {
        tracing::debug!(
            text_chars = request.text.chars().count(),
            voice_id = %request.voice_id,
            "FakeTtsClient: rendering tone"
        );

        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }

        Ok(self.render(&request))
    }

    fn device(&self) -> &str {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::SynthesisParams;

    fn request(text: &str) -> EngineRequest {
        EngineRequest {
            text: text.to_string(),
            reference: None,
            params: SynthesisParams::default(),
            voice_id: "female_default".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duration_scales_with_text() {
        let client = FakeTtsClient::new(FakeTtsClientConfig {
            sample_rate: 16000,
            delay: Duration::ZERO,
        });

        let short = client.synthesize(request("hi")).await.unwrap();
        assert_eq!(short.sample_rate, 16000);
        assert!((short.duration_secs() - 0.5).abs() < 1e-3);

        let long = client.synthesize(request(&"a".repeat(100))).await.unwrap();
        assert!((long.duration_secs() - 6.0).abs() < 1e-3);
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let client = FakeTtsClient::new(FakeTtsClientConfig {
            sample_rate: 8000,
            delay: Duration::ZERO,
        });
        let a = client.synthesize(request("same text")).await.unwrap();
        let b = client.synthesize(request("same text")).await.unwrap();
        assert_eq!(a, b);
    }
}

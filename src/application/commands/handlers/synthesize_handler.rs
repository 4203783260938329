//! Synthesize Command Handler
//!
//! 合成主路径：校验 → 解析音色 → 加载参考音频 → 经引擎门调用引擎 → 编码 WAV → 先字节后元数据落盘。
//! 任何一步失败都不会产生 AudioRecord。

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::{Synthesize, SynthesizeResponse};
use crate::application::engine_gate::{EngineGate, GateError};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioCodecPort, EngineRequest, Namespace, ReferenceAudio, ReferenceFetcherPort,
    TtsEnginePort, Waveform,
};
use crate::application::queries::handlers::GetVoiceHandler;
use crate::application::StorageBackend;
use crate::domain::audio::{AudioId, AudioRecord};
use crate::domain::synthesis::SynthesisText;
use crate::domain::voice::{AudioFormat, ReferenceSource, Voice, VoiceId};

/// Synthesize Handler
pub struct SynthesizeHandler {
    voices: GetVoiceHandler,
    storage: StorageBackend,
    engine: Arc<dyn TtsEnginePort>,
    gate: EngineGate,
    codec: Arc<dyn AudioCodecPort>,
    fetcher: Arc<dyn ReferenceFetcherPort>,
    /// 远程参考音频缓存，key = URL
    remote_cache: DashMap<String, ReferenceAudio>,
}

impl SynthesizeHandler {
    pub fn new(
        voices: GetVoiceHandler,
        storage: StorageBackend,
        engine: Arc<dyn TtsEnginePort>,
        gate: EngineGate,
        codec: Arc<dyn AudioCodecPort>,
        fetcher: Arc<dyn ReferenceFetcherPort>,
    ) -> Self {
        Self {
            voices,
            storage,
            engine,
            gate,
            codec,
            fetcher,
            remote_cache: DashMap::new(),
        }
    }

    pub async fn handle(&self, command: Synthesize) -> Result<SynthesizeResponse, ApplicationError> {
        let text = SynthesisText::new(command.text)?;
        command.params.validate()?;

        let voice_id = VoiceId::parse(command.voice_id.as_str())
            .map_err(|_| ApplicationError::not_found("Voice", command.voice_id.as_str()))?;
        let voice = self.voices.find(&voice_id).await?;
        let reference = self.load_reference(&voice).await?;

        tracing::info!(
            voice_id = %voice_id,
            text_chars = text.as_str().chars().count(),
            has_reference = reference.is_some(),
            queue_depth = self.gate.queue_depth(),
            "Synthesis requested"
        );

        let request = EngineRequest {
            text: text.as_str().to_string(),
            reference,
            params: command.params,
            voice_id: voice_id.to_string(),
        };
        let (waveform, generation_time) = self.run_engine(request).await?;

        if waveform.samples.is_empty() || waveform.sample_rate == 0 {
            tracing::error!(voice_id = %voice_id, "Engine returned an empty waveform");
            return Err(ApplicationError::SynthesisError(
                "engine returned an empty waveform".to_string(),
            ));
        }

        let duration = waveform.duration_secs();
        let sample_rate = waveform.sample_rate;
        let wav = self.encode(waveform).await?;

        let record = self
            .persist(text.into_inner(), &voice, wav, sample_rate, duration, generation_time)
            .await?;

        tracing::info!(
            audio_id = %record.audio_id,
            voice_id = %voice_id,
            duration_secs = duration,
            generation_time_secs = generation_time,
            "Synthesis completed"
        );

        Ok(SynthesizeResponse {
            message: format!(
                "Speech synthesized successfully using voice '{}'",
                record.voice_name
            ),
            record,
        })
    }

    /// 经引擎门调用引擎，返回波形与引擎耗时（秒）
    async fn run_engine(&self, request: EngineRequest) -> Result<(Waveform, f64), ApplicationError> {
        let engine = self.engine.clone();
        let voice_id = request.voice_id.clone();

        let outcome = self
            .gate
            .run(async move {
                let started = Instant::now();
                let result = engine.synthesize(request).await;
                (result, started.elapsed().as_secs_f64())
            })
            .await;

        match outcome {
            Ok((Ok(waveform), elapsed)) => Ok((waveform, elapsed)),
            Ok((Err(e), _)) => {
                tracing::error!(voice_id = %voice_id, error = %e, "Synthesis failed");
                Err(e.into())
            }
            Err(GateError::Timeout { waited_ms }) => {
                tracing::warn!(voice_id = %voice_id, waited_ms, "Gave up waiting for the engine");
                Err(ApplicationError::EngineBusy { waited_ms })
            }
            Err(GateError::Aborted(reason)) => {
                tracing::error!(voice_id = %voice_id, reason = %reason, "Engine task aborted");
                Err(ApplicationError::SynthesisError(reason))
            }
        }
    }

    async fn encode(&self, waveform: Waveform) -> Result<Vec<u8>, ApplicationError> {
        let codec = self.codec.clone();
        tokio::task::spawn_blocking(move || codec.encode_wav(&waveform))
            .await
            .map_err(|e| ApplicationError::internal(format!("encode task failed: {}", e)))?
            .map_err(ApplicationError::from)
    }

    async fn persist(
        &self,
        text: String,
        voice: &Voice,
        wav: Vec<u8>,
        sample_rate: u32,
        duration: f64,
        generation_time: f64,
    ) -> Result<AudioRecord, ApplicationError> {
        let audio_id = AudioId::new();
        let key = audio_id.to_string();
        let record = AudioRecord::new(
            audio_id,
            text,
            voice,
            sample_rate,
            duration,
            generation_time,
            wav.len() as u64,
        );

        self.storage.put(Namespace::Audio, &key, &wav).await?;
        if let Err(e) = self
            .storage
            .put_metadata(Namespace::Audio, &key, &record)
            .await
        {
            if let Err(cleanup) = self.storage.delete(Namespace::Audio, &key).await {
                tracing::warn!(audio_id = %key, error = %cleanup, "Failed to remove orphaned audio bytes");
            }
            return Err(e.into());
        }
        Ok(record)
    }

    /// 加载条件参考音频；None 表示让引擎使用自身默认
    async fn load_reference(&self, voice: &Voice) -> Result<Option<ReferenceAudio>, ApplicationError> {
        match voice.reference() {
            ReferenceSource::Stored { format, .. } => {
                // 并发删除先删字节再删元数据，字节缺失等同于音色已删除
                let data = match self.storage.get(Namespace::Voices, voice.id().as_str()).await {
                    Ok(data) => data,
                    Err(e) if e.is_not_found() => {
                        tracing::warn!(voice_id = %voice.id(), "Reference audio gone, voice is being deleted");
                        return Err(ApplicationError::not_found("Voice", voice.id().as_str()));
                    }
                    Err(e) => {
                        tracing::error!(voice_id = %voice.id(), error = %e, "Failed to read reference audio");
                        return Err(ApplicationError::StorageError(e.to_string()));
                    }
                };
                Ok(Some(ReferenceAudio {
                    data,
                    format: *format,
                }))
            }
            ReferenceSource::Remote { url } => Ok(self.fetch_remote(voice.id(), url).await),
            ReferenceSource::EngineDefault => Ok(None),
        }
    }

    /// 下载失败时退回引擎默认参考音频
    async fn fetch_remote(&self, voice_id: &VoiceId, url: &str) -> Option<ReferenceAudio> {
        if let Some(cached) = self.remote_cache.get(url) {
            return Some(cached.value().clone());
        }

        match self.fetcher.fetch(url).await {
            Ok(data) if !data.is_empty() => {
                let format = AudioFormat::sniff(&data)
                    .or_else(|| AudioFormat::from_filename(url))
                    .unwrap_or(AudioFormat::Wav);
                let reference = ReferenceAudio { data, format };
                self.remote_cache.insert(url.to_string(), reference.clone());
                tracing::info!(voice_id = %voice_id, url = %url, "Reference audio downloaded");
                Some(reference)
            }
            Ok(_) => {
                tracing::warn!(voice_id = %voice_id, url = %url, "Reference audio download was empty, using engine default");
                None
            }
            Err(e) => {
                tracing::warn!(voice_id = %voice_id, url = %url, error = %e, "Reference audio download failed, using engine default");
                None
            }
        }
    }
}

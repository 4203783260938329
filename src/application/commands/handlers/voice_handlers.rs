//! Voice Command Handlers
//!
//! 自定义音色的创建与删除。内置音色不可删除、不可覆盖。

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::commands::{CreateVoice, DeleteVoice};
use crate::application::error::{ApplicationError, InvalidAudioReason};
use crate::application::ports::{AudioCodecPort, AudioInfo, CodecError, Namespace};
use crate::application::StorageBackend;
use crate::domain::voice::{AudioFormat, BuiltinVoices, Voice, VoiceId, VoiceName};

/// 参考音频最短时长（秒，含边界）
pub const MIN_REFERENCE_SECS: f64 = 5.0;
/// 参考音频最长时长（秒，含边界）
pub const MAX_REFERENCE_SECS: f64 = 30.0;

const DEFAULT_DESCRIPTION: &str = "Custom voice";
const MAX_ID_ATTEMPTS: usize = 8;

/// 已删除音色的墓碑，防止 ID 复用
#[derive(Debug, Serialize, Deserialize)]
struct VoiceTombstone {
    voice_id: VoiceId,
    deleted_at: chrono::DateTime<Utc>,
}

// ============================================================================
// CreateVoice
// ============================================================================

/// CreateVoice Handler
pub struct CreateVoiceHandler {
    builtins: Arc<BuiltinVoices>,
    storage: StorageBackend,
    codec: Arc<dyn AudioCodecPort>,
}

impl CreateVoiceHandler {
    pub fn new(
        builtins: Arc<BuiltinVoices>,
        storage: StorageBackend,
        codec: Arc<dyn AudioCodecPort>,
    ) -> Self {
        Self {
            builtins,
            storage,
            codec,
        }
    }

    pub async fn handle(&self, command: CreateVoice) -> Result<Voice, ApplicationError> {
        let name = VoiceName::new(command.name)?;
        let description = command
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let audio = command.audio_data;
        if audio.is_empty() {
            return Err(ApplicationError::InvalidAudio(InvalidAudioReason::Empty));
        }
        let format = detect_format(&audio, command.audio_filename.as_deref())?;
        let (audio, info) = self.inspect(audio, format).await?;

        if !(MIN_REFERENCE_SECS..=MAX_REFERENCE_SECS).contains(&info.duration_secs) {
            return Err(ApplicationError::InvalidAudio(InvalidAudioReason::Duration {
                seconds: info.duration_secs,
                min: MIN_REFERENCE_SECS,
                max: MAX_REFERENCE_SECS,
            }));
        }

        let voice_id = self.allocate_id().await?;
        let voice = Voice::custom(
            voice_id.clone(),
            name,
            description,
            format,
            info.sample_rate,
            info.duration_secs,
        );

        // 先字节后元数据
        self.storage
            .put(Namespace::Voices, voice_id.as_str(), &audio)
            .await?;
        if let Err(e) = self
            .storage
            .put_metadata(Namespace::Voices, voice_id.as_str(), &voice)
            .await
        {
            if let Err(cleanup) = self.storage.delete(Namespace::Voices, voice_id.as_str()).await {
                tracing::warn!(voice_id = %voice_id, error = %cleanup, "Failed to remove orphaned reference audio");
            }
            return Err(e.into());
        }

        tracing::info!(
            voice_id = %voice_id,
            name = %voice.name(),
            format = format.extension(),
            sample_rate = info.sample_rate,
            duration_secs = info.duration_secs,
            "Voice created"
        );

        Ok(voice)
    }

    /// 解码是 CPU 密集操作，放到阻塞线程池
    async fn inspect(
        &self,
        audio: Vec<u8>,
        format: AudioFormat,
    ) -> Result<(Vec<u8>, AudioInfo), ApplicationError> {
        let codec = self.codec.clone();
        let (audio, inspected) = tokio::task::spawn_blocking(move || {
            let inspected = codec.inspect(&audio, format);
            (audio, inspected)
        })
        .await
        .map_err(|e| ApplicationError::internal(format!("inspect task failed: {}", e)))?;

        let info = inspected.map_err(|e| {
            tracing::debug!(error = %e, "Reference audio rejected");
            let reason = match e {
                CodecError::UnsupportedFormat(msg) => InvalidAudioReason::UnsupportedFormat(msg),
                CodecError::DecodingError(msg) | CodecError::EncodingError(msg) => {
                    InvalidAudioReason::Undecodable(msg)
                }
            };
            ApplicationError::InvalidAudio(reason)
        })?;
        Ok((audio, info))
    }

    /// 生成从未使用过的 ID（包括已删除的）
    async fn allocate_id(&self) -> Result<VoiceId, ApplicationError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = VoiceId::generate();
            if self.builtins.contains(&candidate) {
                continue;
            }
            let live = self
                .storage
                .has_metadata(Namespace::Voices, candidate.as_str())
                .await?;
            let retired = self
                .storage
                .has_metadata(Namespace::VoiceTombstones, candidate.as_str())
                .await?;
            if !live && !retired {
                return Ok(candidate);
            }
            tracing::debug!(voice_id = %candidate, "Voice id collision, regenerating");
        }
        Err(ApplicationError::internal("could not allocate a unique voice id"))
    }
}

/// 内容魔数优先，其次扩展名；未知扩展名直接拒绝
fn detect_format(data: &[u8], filename: Option<&str>) -> Result<AudioFormat, ApplicationError> {
    let extension = filename
        .and_then(|f| std::path::Path::new(f).extension())
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    if let Some(ext) = &extension {
        if AudioFormat::from_extension(ext).is_none() {
            return Err(ApplicationError::InvalidAudio(
                InvalidAudioReason::UnsupportedFormat(format!(".{}", ext)),
            ));
        }
    }

    AudioFormat::sniff(data)
        .or_else(|| extension.as_deref().and_then(AudioFormat::from_extension))
        .ok_or_else(|| {
            ApplicationError::InvalidAudio(InvalidAudioReason::UnsupportedFormat(
                "unrecognized audio content".to_string(),
            ))
        })
}

// ============================================================================
// DeleteVoice
// ============================================================================

/// DeleteVoice Handler
pub struct DeleteVoiceHandler {
    builtins: Arc<BuiltinVoices>,
    storage: StorageBackend,
}

impl DeleteVoiceHandler {
    pub fn new(builtins: Arc<BuiltinVoices>, storage: StorageBackend) -> Self {
        Self { builtins, storage }
    }

    pub async fn handle(&self, command: DeleteVoice) -> Result<(), ApplicationError> {
        let voice_id = VoiceId::parse(command.voice_id.as_str())
            .map_err(|_| ApplicationError::not_found("Voice", command.voice_id.as_str()))?;

        if self.builtins.contains(&voice_id) {
            return Err(ApplicationError::Forbidden(format!(
                "cannot delete built-in voice '{}'",
                voice_id
            )));
        }

        let voice: Voice = match self
            .storage
            .get_metadata(Namespace::Voices, voice_id.as_str())
            .await
        {
            Ok(voice) => voice,
            Err(e) if e.is_not_found() => {
                return Err(ApplicationError::not_found("Voice", voice_id.as_str()))
            }
            Err(e) => return Err(e.into()),
        };

        let tombstone = VoiceTombstone {
            voice_id: voice_id.clone(),
            deleted_at: Utc::now(),
        };
        self.storage
            .put_metadata(Namespace::VoiceTombstones, voice_id.as_str(), &tombstone)
            .await?;

        self.storage
            .delete(Namespace::Voices, voice_id.as_str())
            .await?;
        // 并发删除时只有一方真正删掉记录，另一方得到 NotFound
        if !self
            .storage
            .delete_metadata(Namespace::Voices, voice_id.as_str())
            .await?
        {
            return Err(ApplicationError::not_found("Voice", voice_id.as_str()));
        }

        tracing::info!(
            voice_id = %voice_id,
            name = %voice.name(),
            "Voice deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_storage, offline_builtins, wav_fixture};
    use crate::domain::voice::{ReferenceSource, VoiceKind};
    use crate::infrastructure::adapters::SymphoniaCodec;
    use std::collections::HashSet;

    struct Fixture {
        storage: StorageBackend,
        create: CreateVoiceHandler,
        delete: DeleteVoiceHandler,
    }

    fn fixture() -> Fixture {
        let storage = memory_storage();
        let builtins = Arc::new(offline_builtins());
        Fixture {
            create: CreateVoiceHandler::new(
                builtins.clone(),
                storage.clone(),
                Arc::new(SymphoniaCodec::new()),
            ),
            delete: DeleteVoiceHandler::new(builtins, storage.clone()),
            storage,
        }
    }

    fn upload(name: &str, seconds: f64) -> CreateVoice {
        CreateVoice {
            name: name.to_string(),
            description: None,
            audio_data: wav_fixture(seconds, 16000),
            audio_filename: Some("sample.wav".to_string()),
        }
    }

    fn reason(err: ApplicationError) -> InvalidAudioReason {
        match err {
            ApplicationError::InvalidAudio(reason) => reason,
            other => panic!("expected InvalidAudio, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_voice_persists_bytes_and_metadata() {
        let fx = fixture();
        let voice = fx.create.handle(upload("  Test  ", 10.0)).await.unwrap();

        assert_eq!(voice.name().as_str(), "Test");
        assert_eq!(voice.kind(), VoiceKind::Custom);
        assert_eq!(voice.description(), "Custom voice");
        assert!((voice.audio_duration().unwrap() - 10.0).abs() < 1e-6);
        assert_eq!(
            voice.reference(),
            &ReferenceSource::Stored {
                format: AudioFormat::Wav,
                sample_rate: 16000
            }
        );
        assert!(voice.id().as_str().starts_with("voice_"));

        let bytes = fx
            .storage
            .get(Namespace::Voices, voice.id().as_str())
            .await
            .unwrap();
        assert_eq!(bytes, wav_fixture(10.0, 16000));
        let stored: Voice = fx
            .storage
            .get_metadata(Namespace::Voices, voice.id().as_str())
            .await
            .unwrap();
        assert_eq!(stored.id(), voice.id());
    }

    #[tokio::test]
    async fn test_duration_boundaries_are_inclusive() {
        let fx = fixture();
        assert!(fx.create.handle(upload("five", 5.0)).await.is_ok());
        assert!(fx.create.handle(upload("thirty", 30.0)).await.is_ok());

        let short = fx.create.handle(upload("short", 4.9)).await.unwrap_err();
        assert!(matches!(reason(short), InvalidAudioReason::Duration { .. }));
        let long = fx.create.handle(upload("long", 30.1)).await.unwrap_err();
        assert!(matches!(reason(long), InvalidAudioReason::Duration { .. }));
    }

    #[tokio::test]
    async fn test_format_errors_differ_from_duration_errors() {
        let fx = fixture();

        let mut empty = upload("empty", 10.0);
        empty.audio_data.clear();
        assert_eq!(
            reason(fx.create.handle(empty).await.unwrap_err()),
            InvalidAudioReason::Empty
        );

        let mut text_file = upload("text", 10.0);
        text_file.audio_filename = Some("notes.txt".to_string());
        assert!(matches!(
            reason(fx.create.handle(text_file).await.unwrap_err()),
            InvalidAudioReason::UnsupportedFormat(_)
        ));

        let garbage = CreateVoice {
            name: "garbage".to_string(),
            description: None,
            audio_data: vec![0x42; 2048],
            audio_filename: Some("broken.wav".to_string()),
        };
        assert!(matches!(
            reason(fx.create.handle(garbage).await.unwrap_err()),
            InvalidAudioReason::Undecodable(_) | InvalidAudioReason::UnsupportedFormat(_)
        ));
    }

    #[tokio::test]
    async fn test_empty_name_is_validation_error() {
        let fx = fixture();
        let err = fx.create.handle(upload("   ", 10.0)).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::ValidationError { field: "name", .. }
        ));
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let fx = fixture();
        let _ = fx.create.handle(upload("short", 2.0)).await.unwrap_err();
        let usage = fx.storage.blob_usage(Namespace::Voices).await.unwrap();
        assert_eq!(usage.count, 0);
    }

    #[tokio::test]
    async fn test_delete_builtin_is_forbidden() {
        let fx = fixture();
        for id in ["female_default", "male_professional"] {
            let err = fx
                .delete
                .handle(DeleteVoice {
                    voice_id: id.to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::Forbidden(_)));
        }
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let fx = fixture();
        let voice = fx.create.handle(upload("Temp", 8.0)).await.unwrap();
        let command = DeleteVoice {
            voice_id: voice.id().to_string(),
        };

        fx.delete.handle(command.clone()).await.unwrap();
        assert!(fx
            .storage
            .get(Namespace::Voices, voice.id().as_str())
            .await
            .unwrap_err()
            .is_not_found());

        let err = fx.delete.handle(command).await.unwrap_err();
        assert!(err.is_not_found());

        let unknown = fx
            .delete
            .handle(DeleteVoice {
                voice_id: "nonexistent".to_string(),
            })
            .await
            .unwrap_err();
        assert!(unknown.is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_deletes_have_one_winner() {
        let fx = fixture();
        let voice = fx.create.handle(upload("Race", 6.0)).await.unwrap();
        let delete = Arc::new(fx.delete);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let delete = delete.clone();
            let voice_id = voice.id().to_string();
            handles.push(tokio::spawn(async move {
                delete.handle(DeleteVoice { voice_id }).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(e) => assert!(e.is_not_found(), "loser must see NotFound, got {e:?}"),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let fx = fixture();
        let mut seen = HashSet::new();
        for i in 0..5 {
            let voice = fx.create.handle(upload(&format!("v{i}"), 5.0)).await.unwrap();
            assert!(seen.insert(voice.id().clone()));
            fx.delete
                .handle(DeleteVoice {
                    voice_id: voice.id().to_string(),
                })
                .await
                .unwrap();
            assert!(fx
                .storage
                .has_metadata(Namespace::VoiceTombstones, voice.id().as_str())
                .await
                .unwrap());
        }
    }
}

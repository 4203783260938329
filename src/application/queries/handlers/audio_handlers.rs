//! Audio Query Handlers
//!
//! 元数据是存在性的唯一依据：没有 AudioRecord 的字节视为孤儿，不对外可见

use crate::application::error::ApplicationError;
use crate::application::ports::Namespace;
use crate::application::queries::{GetAudio, GetAudioInfo, GetAudioResponse, ListAudio};
use crate::application::StorageBackend;
use crate::domain::audio::{AudioId, AudioRecord, AudioSummary};

/// 生成音频列表（最新在前）
#[derive(Debug, Clone)]
pub struct AudioList {
    pub audio_files: Vec<AudioSummary>,
    pub total: usize,
}

/// 读取 AudioRecord，非法或不存在的 ID 都是 NotFound
pub(crate) async fn load_record(
    storage: &StorageBackend,
    raw_id: &str,
) -> Result<AudioRecord, ApplicationError> {
    let audio_id =
        AudioId::parse(raw_id).map_err(|_| ApplicationError::not_found("Audio", raw_id))?;

    match storage
        .get_metadata::<AudioRecord>(Namespace::Audio, &audio_id.to_string())
        .await
    {
        Ok(record) => Ok(record),
        Err(e) if e.is_not_found() => Err(ApplicationError::not_found("Audio", raw_id)),
        Err(e) => Err(e.into()),
    }
}

/// GetAudio Handler
pub struct GetAudioHandler {
    storage: StorageBackend,
}

impl GetAudioHandler {
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, query: GetAudio) -> Result<GetAudioResponse, ApplicationError> {
        let record = load_record(&self.storage, &query.audio_id).await?;
        let key = record.audio_id.to_string();

        let audio_data = match self.storage.get(Namespace::Audio, &key).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                tracing::warn!(audio_id = %key, "Audio record exists but bytes are missing");
                return Err(ApplicationError::not_found("Audio file", key));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(GetAudioResponse {
            audio_data,
            content_type: record.content_type,
        })
    }
}

/// GetAudioInfo Handler
pub struct GetAudioInfoHandler {
    storage: StorageBackend,
}

impl GetAudioInfoHandler {
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, query: GetAudioInfo) -> Result<AudioRecord, ApplicationError> {
        load_record(&self.storage, &query.audio_id).await
    }
}

/// ListAudio Handler
pub struct ListAudioHandler {
    storage: StorageBackend,
}

impl ListAudioHandler {
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, _query: ListAudio) -> Result<AudioList, ApplicationError> {
        let mut records = self
            .storage
            .list_metadata::<AudioRecord>(Namespace::Audio)
            .await?;
        records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

        let audio_files: Vec<AudioSummary> = records.iter().map(AudioRecord::summary).collect();
        Ok(AudioList {
            total: audio_files.len(),
            audio_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_storage, offline_builtins};
    use crate::domain::voice::VoiceId;
    use chrono::{Duration, Utc};

    async fn insert(storage: &StorageBackend, text: &str, age_secs: i64) -> AudioRecord {
        let builtins = offline_builtins();
        let voice = builtins
            .get(&VoiceId::parse("female_default").unwrap())
            .unwrap();
        let mut record = AudioRecord::new(AudioId::new(), text.to_string(), voice, 24000, 1.5, 0.2, 4);
        record.generated_at = Utc::now() - Duration::seconds(age_secs);

        let key = record.audio_id.to_string();
        storage.put(Namespace::Audio, &key, b"RIFF").await.unwrap();
        storage
            .put_metadata(Namespace::Audio, &key, &record)
            .await
            .unwrap();
        record
    }

    #[tokio::test]
    async fn test_get_audio_returns_persisted_bytes() {
        let storage = memory_storage();
        let record = insert(&storage, "hello", 0).await;

        let response = GetAudioHandler::new(storage)
            .handle(GetAudio {
                audio_id: record.audio_id.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.audio_data, b"RIFF");
        assert_eq!(response.content_type, "audio/wav");
    }

    #[tokio::test]
    async fn test_orphan_bytes_are_invisible() {
        let storage = memory_storage();
        let orphan = AudioId::new().to_string();
        storage.put(Namespace::Audio, &orphan, b"RIFF").await.unwrap();

        let err = GetAudioHandler::new(storage.clone())
            .handle(GetAudio {
                audio_id: orphan.clone(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let list = ListAudioHandler::new(storage).handle(ListAudio).await.unwrap();
        assert_eq!(list.total, 0);
    }

    #[tokio::test]
    async fn test_info_for_malformed_id_is_not_found() {
        let handler = GetAudioInfoHandler::new(memory_storage());
        let err = handler
            .handle(GetAudioInfo {
                audio_id: "not-a-uuid".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first_with_preview() {
        let storage = memory_storage();
        insert(&storage, "oldest", 300).await;
        insert(&storage, &"x".repeat(80), 0).await;
        insert(&storage, "middle", 100).await;

        let list = ListAudioHandler::new(storage).handle(ListAudio).await.unwrap();
        assert_eq!(list.total, 3);
        assert_eq!(list.audio_files[0].text, format!("{}...", "x".repeat(50)));
        assert_eq!(list.audio_files[1].text, "middle");
        assert_eq!(list.audio_files[2].text, "oldest");
    }
}

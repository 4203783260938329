//! Audio Command Handlers - 删除与保留策略清理

use chrono::Utc;

use crate::application::commands::{DeleteAudio, PurgeAudio, PurgeResult};
use crate::application::error::ApplicationError;
use crate::application::ports::Namespace;
use crate::application::queries::handlers::load_record;
use crate::application::StorageBackend;
use crate::domain::audio::AudioRecord;

/// 删除一条生成音频：先字节后元数据。返回是否由本次调用删除
async fn remove_record(storage: &StorageBackend, record: &AudioRecord) -> Result<bool, ApplicationError> {
    let key = record.audio_id.to_string();
    storage.delete(Namespace::Audio, &key).await?;
    Ok(storage.delete_metadata(Namespace::Audio, &key).await?)
}

// ============================================================================
// DeleteAudio
// ============================================================================

/// DeleteAudio Handler
pub struct DeleteAudioHandler {
    storage: StorageBackend,
}

impl DeleteAudioHandler {
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, command: DeleteAudio) -> Result<(), ApplicationError> {
        let record = load_record(&self.storage, &command.audio_id).await?;

        if !remove_record(&self.storage, &record).await? {
            return Err(ApplicationError::not_found("Audio", command.audio_id));
        }

        tracing::info!(audio_id = %record.audio_id, "Audio deleted");
        Ok(())
    }
}

// ============================================================================
// PurgeAudio
// ============================================================================

/// PurgeAudio Handler
pub struct PurgeAudioHandler {
    storage: StorageBackend,
}

impl PurgeAudioHandler {
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, command: PurgeAudio) -> Result<PurgeResult, ApplicationError> {
        let mut records = self
            .storage
            .list_metadata::<AudioRecord>(Namespace::Audio)
            .await?;
        // 最新在前，超出 max_records 的尾部即最旧的
        records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

        let cutoff = match command.max_age {
            Some(age) => {
                let age = chrono::Duration::from_std(age)
                    .map_err(|e| ApplicationError::validation("max_age", e.to_string()))?;
                Some(Utc::now() - age)
            }
            None => None,
        };

        let mut result = PurgeResult::default();
        for (index, record) in records.iter().enumerate() {
            let expired = cutoff.is_some_and(|cutoff| record.generated_at < cutoff);
            let over_capacity = command.max_records.is_some_and(|max| index >= max);
            if !expired && !over_capacity {
                continue;
            }

            // 与用户删除并发时，对方已删除则不计数
            if remove_record(&self.storage, record).await? {
                result.deleted += 1;
                result.freed_bytes += record.size_bytes;
            }
        }

        if result.deleted > 0 {
            tracing::info!(
                deleted = result.deleted,
                freed_bytes = result.freed_bytes,
                "Audio retention purge completed"
            );
        } else {
            tracing::debug!(records = records.len(), "Audio retention purge found nothing to delete");
        }

        Ok(result)
    }
}

//! Voice Query Handlers
//!
//! 内置音色来自启动时构建的只读表，自定义音色来自 voices 命名空间

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::Namespace;
use crate::application::queries::{GetVoice, ListVoices};
use crate::application::StorageBackend;
use crate::domain::voice::{BuiltinVoices, Voice, VoiceId};

// ============================================================================
// Response DTOs
// ============================================================================

/// 音色列表（内置在前，自定义按创建时间）
#[derive(Debug, Clone)]
pub struct VoiceList {
    pub voices: Vec<Voice>,
    pub total: usize,
    pub builtin: usize,
    pub custom: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetVoice Handler
#[derive(Clone)]
pub struct GetVoiceHandler {
    builtins: Arc<BuiltinVoices>,
    storage: StorageBackend,
}

impl GetVoiceHandler {
    pub fn new(builtins: Arc<BuiltinVoices>, storage: StorageBackend) -> Self {
        Self { builtins, storage }
    }

    pub async fn handle(&self, query: GetVoice) -> Result<Voice, ApplicationError> {
        // 非法 ID 不可能存在
        let voice_id = VoiceId::parse(query.voice_id.as_str())
            .map_err(|_| ApplicationError::not_found("Voice", query.voice_id.as_str()))?;
        self.find(&voice_id).await
    }

    /// 按 ID 解析音色：先查内置表，再查存储
    pub async fn find(&self, voice_id: &VoiceId) -> Result<Voice, ApplicationError> {
        if let Some(voice) = self.builtins.get(voice_id) {
            return Ok(voice.clone());
        }

        match self
            .storage
            .get_metadata::<Voice>(Namespace::Voices, voice_id.as_str())
            .await
        {
            Ok(voice) => Ok(voice),
            Err(e) if e.is_not_found() => {
                Err(ApplicationError::not_found("Voice", voice_id.as_str()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    builtins: Arc<BuiltinVoices>,
    storage: StorageBackend,
}

impl ListVoicesHandler {
    pub fn new(builtins: Arc<BuiltinVoices>, storage: StorageBackend) -> Self {
        Self { builtins, storage }
    }

    pub async fn handle(&self, _query: ListVoices) -> Result<VoiceList, ApplicationError> {
        let mut custom: Vec<Voice> = self
            .storage
            .list_metadata::<Voice>(Namespace::Voices)
            .await?
            .into_iter()
            .filter(|v| !v.is_builtin() && !self.builtins.contains(v.id()))
            .collect();
        custom.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });

        let builtin_count = self.builtins.len();
        let custom_count = custom.len();

        let mut voices: Vec<Voice> = self.builtins.iter().cloned().collect();
        voices.extend(custom);

        Ok(VoiceList {
            total: voices.len(),
            voices,
            builtin: builtin_count,
            custom: custom_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_storage, offline_builtins};
    use crate::domain::voice::{AudioFormat, VoiceName};
    use chrono::{Duration, Utc};

    fn custom_voice(name: &str) -> Voice {
        Voice::custom(
            VoiceId::generate(),
            VoiceName::new(name).unwrap(),
            String::new(),
            AudioFormat::Wav,
            16000,
            10.0,
        )
    }

    #[tokio::test]
    async fn test_list_puts_builtins_first() {
        let storage = memory_storage();
        let builtins = Arc::new(offline_builtins());

        let first = custom_voice("First");
        storage
            .put_metadata(Namespace::Voices, first.id().as_str(), &first)
            .await
            .unwrap();
        // 确保创建时间严格递增
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = custom_voice("Second");
        storage
            .put_metadata(Namespace::Voices, second.id().as_str(), &second)
            .await
            .unwrap();

        let handler = ListVoicesHandler::new(builtins, storage);
        let list = handler.handle(ListVoices).await.unwrap();

        assert_eq!(list.total, 4);
        assert_eq!(list.builtin, 2);
        assert_eq!(list.custom, 2);
        let names: Vec<&str> = list.voices.iter().map(|v| v.name().as_str()).collect();
        assert_eq!(
            names,
            vec!["Female Default", "Male Professional", "First", "Second"]
        );
        assert!(list.voices[1].created_at() < Utc::now() - Duration::days(1));
    }

    #[tokio::test]
    async fn test_get_resolves_builtin_and_custom() {
        let storage = memory_storage();
        let voice = custom_voice("Mine");
        storage
            .put_metadata(Namespace::Voices, voice.id().as_str(), &voice)
            .await
            .unwrap();

        let handler = GetVoiceHandler::new(Arc::new(offline_builtins()), storage);
        let builtin = handler
            .handle(GetVoice {
                voice_id: "male_professional".to_string(),
            })
            .await
            .unwrap();
        assert!(builtin.is_builtin());

        let custom = handler
            .handle(GetVoice {
                voice_id: voice.id().to_string(),
            })
            .await
            .unwrap();
        assert_eq!(custom.name().as_str(), "Mine");
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_is_not_found() {
        let handler = GetVoiceHandler::new(Arc::new(offline_builtins()), memory_storage());
        for id in ["nonexistent", "../etc/passwd", ""] {
            let err = handler
                .handle(GetVoice {
                    voice_id: id.to_string(),
                })
                .await
                .unwrap_err();
            assert!(err.is_not_found(), "{id} should be NotFound");
        }
    }
}

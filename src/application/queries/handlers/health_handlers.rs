//! Health Query Handler

use chrono::Utc;
use serde::de::IgnoredAny;
use std::sync::Arc;

use crate::application::engine_gate::EngineGate;
use crate::application::error::ApplicationError;
use crate::application::ports::{Namespace, TtsEnginePort};
use crate::application::queries::{GetHealth, HealthReport};
use crate::application::StorageBackend;
use crate::domain::voice::BuiltinVoices;

/// GetHealth Handler
pub struct GetHealthHandler {
    engine: Arc<dyn TtsEnginePort>,
    gate: EngineGate,
    builtins: Arc<BuiltinVoices>,
    storage: StorageBackend,
}

impl GetHealthHandler {
    pub fn new(
        engine: Arc<dyn TtsEnginePort>,
        gate: EngineGate,
        builtins: Arc<BuiltinVoices>,
        storage: StorageBackend,
    ) -> Self {
        Self {
            engine,
            gate,
            builtins,
            storage,
        }
    }

    /// 不经过引擎门，合成进行中也能立即返回
    pub async fn handle(&self, _query: GetHealth) -> Result<HealthReport, ApplicationError> {
        let model_loaded = self.engine.health_check().await;
        let custom = self
            .storage
            .list_metadata::<IgnoredAny>(Namespace::Voices)
            .await?
            .len();

        Ok(HealthReport {
            model_loaded,
            device: self.engine.device().to_string(),
            voices_total: self.builtins.len() + custom,
            queue_depth: self.gate.queue_depth(),
            engine_busy: self.gate.is_busy(),
            checked_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_storage, offline_builtins, StubEngine};
    use std::time::Duration;

    #[tokio::test]
    async fn test_health_is_not_blocked_by_running_synthesis() {
        let gate = EngineGate::new(None);
        let handler = GetHealthHandler::new(
            Arc::new(StubEngine::new(Duration::ZERO)),
            gate.clone(),
            Arc::new(offline_builtins()),
            memory_storage(),
        );

        let permit = gate.acquire().await.unwrap();
        let report = tokio::time::timeout(Duration::from_secs(1), handler.handle(GetHealth))
            .await
            .expect("health blocked on engine gate")
            .unwrap();
        drop(permit);

        assert!(report.model_loaded);
        assert_eq!(report.device, "stub");
        assert_eq!(report.voices_total, 2);
        assert_eq!(report.queue_depth, 1);
        assert!(report.engine_busy);
    }
}

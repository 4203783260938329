//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::ports::{AudioCodecPort, ReferenceFetcherPort, TtsEnginePort};
use crate::application::{
    // Command handlers
    CreateVoiceHandler, DeleteAudioHandler, DeleteVoiceHandler, SynthesizeHandler,
    // Query handlers
    GetAudioHandler, GetAudioInfoHandler, GetHealthHandler, GetVoiceHandler, ListAudioHandler,
    ListVoicesHandler,
    // Infrastructure facades
    EngineGate, StorageBackend,
};
use crate::domain::voice::BuiltinVoices;

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub create_voice_handler: CreateVoiceHandler,
    pub delete_voice_handler: DeleteVoiceHandler,
    pub synthesize_handler: SynthesizeHandler,
    pub delete_audio_handler: DeleteAudioHandler,

    // ========== Query Handlers ==========
    pub get_voice_handler: GetVoiceHandler,
    pub list_voices_handler: ListVoicesHandler,
    pub get_audio_handler: GetAudioHandler,
    pub get_audio_info_handler: GetAudioInfoHandler,
    pub list_audio_handler: ListAudioHandler,
    pub get_health_handler: GetHealthHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        builtins: Arc<BuiltinVoices>,
        storage: StorageBackend,
        engine: Arc<dyn TtsEnginePort>,
        gate: EngineGate,
        codec: Arc<dyn AudioCodecPort>,
        fetcher: Arc<dyn ReferenceFetcherPort>,
    ) -> Self {
        let get_voice_handler = GetVoiceHandler::new(builtins.clone(), storage.clone());

        Self {
            // Command handlers
            create_voice_handler: CreateVoiceHandler::new(
                builtins.clone(),
                storage.clone(),
                codec.clone(),
            ),
            delete_voice_handler: DeleteVoiceHandler::new(builtins.clone(), storage.clone()),
            synthesize_handler: SynthesizeHandler::new(
                get_voice_handler.clone(),
                storage.clone(),
                engine.clone(),
                gate.clone(),
                codec,
                fetcher,
            ),
            delete_audio_handler: DeleteAudioHandler::new(storage.clone()),

            // Query handlers
            get_voice_handler,
            list_voices_handler: ListVoicesHandler::new(builtins.clone(), storage.clone()),
            get_audio_handler: GetAudioHandler::new(storage.clone()),
            get_audio_info_handler: GetAudioInfoHandler::new(storage.clone()),
            list_audio_handler: ListAudioHandler::new(storage.clone()),
            get_health_handler: GetHealthHandler::new(engine, gate, builtins, storage),
        }
    }
}

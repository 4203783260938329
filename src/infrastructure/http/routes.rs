//! HTTP Routes
//!
//! API Endpoints:
//! - /                         GET     服务状态
//! - /health                   GET     健康检查（不健康时 503）
//! - /voices                   GET     列出所有音色
//! - /voices                   POST    上传自定义音色 (multipart)
//! - /voices/:voice_id         GET     获取音色详情
//! - /voices/:voice_id         DELETE  删除自定义音色
//! - /synthesize               POST    文本合成语音
//! - /audio                    GET     列出生成音频
//! - /audio/:audio_id          GET     下载 WAV
//! - /audio/:audio_id          DELETE  删除生成音频
//! - /audio/:audio_id/info     GET     音频元数据

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 对外公布的端点列表（GET / 返回）
pub const ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /health",
    "GET /voices",
    "POST /voices",
    "GET /voices/{voice_id}",
    "DELETE /voices/{voice_id}",
    "POST /synthesize",
    "GET /audio",
    "GET /audio/{audio_id}",
    "GET /audio/{audio_id}/info",
    "DELETE /audio/{audio_id}",
];

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::service_status))
        .route("/health", get(handlers::health))
        .merge(voice_routes())
        .route("/synthesize", post(handlers::synthesize))
        .merge(audio_routes())
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/voices",
            get(handlers::list_voices).post(handlers::upload_voice),
        )
        .route(
            "/voices/:voice_id",
            get(handlers::get_voice).delete(handlers::delete_voice),
        )
}

/// Audio 路由
fn audio_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/audio", get(handlers::list_audio))
        .route(
            "/audio/:audio_id",
            get(handlers::download_audio).delete(handlers::delete_audio),
        )
        .route("/audio/:audio_id/info", get(handlers::get_audio_info))
}

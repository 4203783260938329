//! Audio Handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::application::{DeleteAudio, GetAudio, GetAudioInfo, ListAudio};
use crate::domain::audio::AudioRecord;
use crate::infrastructure::http::dto::{AudioListResponse, DeleteResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出生成音频（最新在前）
pub async fn list_audio(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AudioListResponse>, ApiError> {
    let result = state.list_audio_handler.handle(ListAudio).await?;

    Ok(Json(AudioListResponse {
        audio_files: result.audio_files,
        total: result.total,
    }))
}

/// 下载生成音频
pub async fn download_audio(
    State(state): State<Arc<AppState>>,
    Path(audio_id): Path<String>,
) -> Result<Response, ApiError> {
    let query = GetAudio {
        audio_id: audio_id.clone(),
    };
    let result = state.get_audio_handler.handle(query).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_LENGTH, result.audio_data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=tts_{}.wav", audio_id),
        )
        .body(Body::from(result.audio_data))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// 音频元数据
pub async fn get_audio_info(
    State(state): State<Arc<AppState>>,
    Path(audio_id): Path<String>,
) -> Result<Json<AudioRecord>, ApiError> {
    let record = state
        .get_audio_info_handler
        .handle(GetAudioInfo { audio_id })
        .await?;

    Ok(Json(record))
}

/// 删除生成音频
pub async fn delete_audio(
    State(state): State<Arc<AppState>>,
    Path(audio_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .delete_audio_handler
        .handle(DeleteAudio {
            audio_id: audio_id.clone(),
        })
        .await?;

    Ok(Json(DeleteResponse::new(format!(
        "Audio '{}' deleted successfully",
        audio_id
    ))))
}

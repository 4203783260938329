//! Voice HTTP Handlers

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{CreateVoice, DeleteVoice, GetVoice, ListVoices};
use crate::infrastructure::http::dto::{
    CreateVoiceResponse, DeleteResponse, VoiceDto, VoiceListResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传音色
///
/// multipart 字段：`voice_name`、`voice_description`（可选）、`audio_file`
pub async fn upload_voice(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CreateVoiceResponse>, ApiError> {
    let mut name = String::new();
    let mut description: Option<String> = None;
    let mut audio: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "voice_name" => {
                name = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read voice_name: {}", e))
                })?;
            }
            "voice_description" => {
                description = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read voice_description: {}", e))
                })?);
            }
            "audio_file" => {
                let filename = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read audio_file: {}", e))
                })?;
                audio = Some((data.to_vec(), filename));
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let (audio_data, audio_filename) =
        audio.ok_or_else(|| ApiError::BadRequest("audio_file is required".to_string()))?;

    let command = CreateVoice {
        name,
        description,
        audio_data,
        audio_filename,
    };

    let voice = state.create_voice_handler.handle(command).await?;

    Ok(Json(CreateVoiceResponse {
        success: true,
        voice_id: voice.id().as_str().to_string(),
        message: format!("Voice '{}' created successfully", voice.name().as_str()),
        voice_info: VoiceDto::from(&voice),
    }))
}

/// 获取音色列表
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VoiceListResponse>, ApiError> {
    let result = state.list_voices_handler.handle(ListVoices).await?;
    Ok(Json(VoiceListResponse::from(result)))
}

/// 获取音色详情
pub async fn get_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<String>,
) -> Result<Json<VoiceDto>, ApiError> {
    let voice = state
        .get_voice_handler
        .handle(GetVoice { voice_id })
        .await?;

    Ok(Json(VoiceDto::from(&voice)))
}

/// 删除自定义音色
pub async fn delete_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .delete_voice_handler
        .handle(DeleteVoice {
            voice_id: voice_id.clone(),
        })
        .await?;

    Ok(Json(DeleteResponse::new(format!(
        "Voice '{}' deleted successfully",
        voice_id
    ))))
}

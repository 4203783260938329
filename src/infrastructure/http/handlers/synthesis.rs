//! Synthesis Handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::application::Synthesize;
use crate::infrastructure::http::dto::{SynthesizeRequest, SynthesizeResponseDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 文本合成语音
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Json<SynthesizeResponseDto>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let command = Synthesize {
        params: req.params(),
        text: req.text,
        voice_id: req.voice_id,
    };

    let result = state.synthesize_handler.handle(command).await?;

    Ok(Json(SynthesizeResponseDto::new(&result.record, result.message)))
}

//! Status Handlers
//!
//! 服务状态与健康检查，均不经过引擎门

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::GetHealth;
use crate::infrastructure::http::dto::{HealthResponse, ServiceStatusResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::routes::ENDPOINTS;
use crate::infrastructure::http::state::AppState;

/// 服务状态
pub async fn service_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServiceStatusResponse>, ApiError> {
    let report = state.get_health_handler.handle(GetHealth).await?;

    Ok(Json(ServiceStatusResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: if report.model_loaded {
            "operational"
        } else {
            "model_loading"
        },
        model_loaded: report.model_loaded,
        device: report.device,
        voices_available: report.voices_total,
        endpoints: ENDPOINTS.to_vec(),
    }))
}

/// 健康检查，引擎不可用时返回 503 供负载均衡摘流
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<HealthResponse>), ApiError> {
    let report = state.get_health_handler.handle(GetHealth).await?;
    let status = if report.model_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((status, Json(HealthResponse::from(report))))
}

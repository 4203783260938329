//! HTTP Middleware
//!
//! 失败请求日志：带上路径中的音色/音频 ID 与耗时，便于和处理器日志对照

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 从路径提取资源 ID：`/voices/{voice_id}`、`/audio/{audio_id}[/info]`
pub fn resource_id(path: &str) -> Option<(&'static str, &str)> {
    let mut segments = path.trim_matches('/').split('/');
    let kind = match segments.next()? {
        "voices" => "voice_id",
        "audio" => "audio_id",
        _ => return None,
    };
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(|id| (kind, id))
}

/// 4xx 记 warn，5xx 记 error；业务错误详情由 `ApiError::into_response` 记录
///
/// 覆盖不经过 ApiError 的拒绝：路由不存在、提取器失败、请求体超限
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let (id_kind, id) = resource_id(&path).unwrap_or(("resource", "-"));

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            id_kind,
            id,
            "Request failed"
        );
    } else {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            id_kind,
            id,
            "Request rejected"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::error::ApiError;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    async fn forbidden_voice() -> Result<&'static str, ApiError> {
        Err(ApiError::Forbidden("builtin voices are read-only".to_string()))
    }

    async fn upload(body: axum::body::Bytes) -> String {
        body.len().to_string()
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/voices/:voice_id", get(forbidden_voice))
            .route("/voices", post(upload))
            .layer(DefaultBodyLimit::max(8))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    #[test]
    fn test_resource_id_from_path() {
        assert_eq!(
            resource_id("/voices/voice_1_abcd"),
            Some(("voice_id", "voice_1_abcd"))
        );
        assert_eq!(resource_id("/audio/abc/info"), Some(("audio_id", "abc")));
        assert_eq!(resource_id("/audio"), None);
        assert_eq!(resource_id("/synthesize"), None);
        assert_eq!(resource_id("/"), None);
    }

    #[tokio::test]
    async fn test_api_error_status_passes_through() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/voices/female_default")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/voices")
            .body(Body::from(vec![0u8; 64]))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_route_passes_through() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

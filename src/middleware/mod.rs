use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_HEADER: &str = "x-session-id";

/// Идентификатор сессии бронирования из заголовка X-Session-Id.
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Uuid);

// Session extractor - аналог браузерной сессии
impl FromRequestParts<Arc<crate::AppState>> for SessionId {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "X-Session-Id header is required".to_string(),
            ))?;

        let id = Uuid::parse_str(raw).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "X-Session-Id must be a valid UUID".to_string(),
            )
        })?;

        // Продлеваем сессию на каждом запросе
        if !state.sessions.touch(id).await {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Session not found or expired".to_string(),
            ));
        }

        Ok(SessionId(id))
    }
}

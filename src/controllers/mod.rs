pub mod admin;
pub mod bookings;
pub mod catalog;
pub mod flow;
pub mod session;

use axum::http::StatusCode;
use axum::Router;
use std::sync::Arc;

use crate::services::backend::BackendError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(session::routes())
        .merge(flow::routes())
        .merge(bookings::routes())
        .merge(catalog::routes())
        .merge(admin::routes())
}

// Перевод ошибки movie-service в HTTP-ответ. Статус и message бэкенда
// пробрасываются как есть; на транспортных ошибках отдаём fallback-текст.
pub(crate) fn backend_error(err: BackendError, fallback: &str) -> (StatusCode, String) {
    match err {
        BackendError::Rejected { status, message } => {
            let status =
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, message)
        }
        BackendError::Transport(e) => {
            tracing::error!("{}: {:?}", fallback, e);
            (StatusCode::BAD_GATEWAY, fallback.to_string())
        }
    }
}

pub(crate) fn session_gone() -> (StatusCode, String) {
    (
        StatusCode::UNAUTHORIZED,
        "Session not found or expired".to_string(),
    )
}

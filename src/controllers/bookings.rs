//! Личный кабинет бронирований: просмотр, история и отмена. Тонкий
//! авторизованный прокси к /bookings movie-service - вся бизнес-логика
//! (статусы, возвраты) остаётся на бэкенде.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{backend_error, session_gone};
use crate::middleware::SessionId;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(my_bookings))
        .route("/bookings/{booking_id}", get(get_booking))
        .route("/bookings/{booking_id}/cancel", put(cancel_booking))
}

/// Токен и id вошедшего пользователя; без входа - 401.
async fn user_auth(
    state: &Arc<AppState>,
    id: Uuid,
) -> Result<(String, i64), (StatusCode, String)> {
    state
        .sessions
        .with_session(id, |s| {
            s.user.as_ref().map(|a| (a.token.clone(), a.user.user_id))
        })
        .await
        .ok_or_else(session_gone)?
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Please sign in to continue".to_string(),
        ))
}

// GET /api/bookings - история бронирований текущего пользователя
async fn my_bookings(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (token, user_id) = user_auth(&state, id).await?;
    let bookings = state
        .backend
        .get_user_bookings(&token, user_id)
        .await
        .map_err(|e| backend_error(e, "Failed to load bookings"))?;
    Ok(Json(bookings))
}

// GET /api/bookings/{booking_id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if booking_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "bookingId must be > 0".to_string()));
    }
    let (token, _) = user_auth(&state, id).await?;
    let booking = state
        .backend
        .get_booking(&token, booking_id)
        .await
        .map_err(|e| backend_error(e, "Failed to load booking"))?;
    Ok(Json(booking))
}

// PUT /api/bookings/{booking_id}/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if booking_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "bookingId must be > 0".to_string()));
    }
    let (token, _) = user_auth(&state, id).await?;
    let booking = state
        .backend
        .cancel_booking(&token, booking_id)
        .await
        .map_err(|e| backend_error(e, "Failed to cancel booking. Please try again."))?;

    info!("Booking {} cancelled on session {}", booking_id, id);
    Ok(Json(booking))
}

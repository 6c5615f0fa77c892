//! Админский бэк-офис: тонкий прокси к /admin/* эндпоинтам movie-service.
//! Токен администратора живёт в серверной сессии и подставляется в
//! Authorization: Bearer; сами данные пробрасываются как непрозрачный JSON.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{backend_error, session_gone};
use crate::middleware::SessionId;
use crate::session::AdminAuth;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout))
        .route("/admin/movies", post(create_movie))
        .route("/admin/movies/{movie_id}", put(update_movie))
        .route("/admin/movies/{movie_id}", delete(delete_movie))
        .route("/admin/theaters", post(create_theater))
        .route("/admin/theaters/{theater_id}", put(update_theater))
        .route("/admin/theaters/{theater_id}", delete(delete_theater))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{user_id}", delete(delete_user))
        .route("/admin/bookings", get(booking_report))
        .route("/admin/bookings/stats", get(booking_stats))
        .route("/admin/analytics/revenue", get(revenue_report))
}

/* ---------- helpers ---------- */

/// Достаёт админский токен из сессии; без входа в бэк-офис - 401.
async fn admin_token(state: &Arc<AppState>, id: Uuid) -> Result<String, (StatusCode, String)> {
    state
        .sessions
        .with_session(id, |s| s.admin.as_ref().map(|a| a.token.clone()))
        .await
        .ok_or_else(session_gone)?
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Admin sign-in required".to_string(),
        ))
}

async fn proxy_get(
    state: Arc<AppState>,
    id: Uuid,
    path: String,
    fallback: &str,
) -> Result<Json<Value>, (StatusCode, String)> {
    let token = admin_token(&state, id).await?;
    let body = state
        .backend
        .admin_get(&token, &path)
        .await
        .map_err(|e| backend_error(e, fallback))?;
    Ok(Json(body))
}

async fn proxy_send(
    state: Arc<AppState>,
    id: Uuid,
    method: Method,
    path: String,
    body: Value,
    fallback: &str,
) -> Result<Json<Value>, (StatusCode, String)> {
    let token = admin_token(&state, id).await?;
    let response = state
        .backend
        .admin_send(&token, method, &path, &body)
        .await
        .map_err(|e| backend_error(e, fallback))?;
    Ok(Json(response))
}

async fn proxy_delete(
    state: Arc<AppState>,
    id: Uuid,
    path: String,
    fallback: &str,
) -> Result<Json<Value>, (StatusCode, String)> {
    let token = admin_token(&state, id).await?;
    state
        .backend
        .admin_delete(&token, &path)
        .await
        .map_err(|e| backend_error(e, fallback))?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/* ---------- AUTH ---------- */

#[derive(Debug, Deserialize)]
struct AdminLoginRequest {
    username: String,
    password: String,
}

// POST /api/admin/login
async fn admin_login(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Username and password are required".to_string(),
        ));
    }

    let response = state
        .backend
        .admin_login(req.username.trim(), &req.password)
        .await
        .map_err(|e| backend_error(e, "Admin sign in failed. Please try again."))?;

    let body = serde_json::json!({
        "admin": response.admin,
        "message": response.message.unwrap_or_else(|| "Signed in".to_string()),
    });

    info!("Admin {} signed in on session {}", response.admin.username, id);
    state
        .sessions
        .with_session(id, |s| {
            s.admin = Some(AdminAuth {
                token: response.token,
                admin: response.admin,
            })
        })
        .await
        .ok_or_else(session_gone)?;

    Ok(Json(body))
}

// POST /api/admin/logout
async fn admin_logout(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .sessions
        .with_session(id, |s| s.admin = None)
        .await
        .ok_or_else(session_gone)?;
    Ok(Json(serde_json::json!({ "message": "Signed out" })))
}

/* ---------- MOVIES ---------- */

async fn create_movie(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_send(
        state,
        id,
        Method::POST,
        "/admin/movies".to_string(),
        body,
        "Failed to create movie",
    )
    .await
}

async fn update_movie(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(movie_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_send(
        state,
        id,
        Method::PUT,
        format!("/admin/movies/{}", movie_id),
        body,
        "Failed to update movie",
    )
    .await
}

async fn delete_movie(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_delete(
        state,
        id,
        format!("/admin/movies/{}", movie_id),
        "Failed to delete movie",
    )
    .await
}

/* ---------- THEATERS ---------- */

async fn create_theater(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_send(
        state,
        id,
        Method::POST,
        "/admin/theaters".to_string(),
        body,
        "Failed to create theater",
    )
    .await
}

async fn update_theater(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(theater_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_send(
        state,
        id,
        Method::PUT,
        format!("/admin/theaters/{}", theater_id),
        body,
        "Failed to update theater",
    )
    .await
}

async fn delete_theater(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(theater_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_delete(
        state,
        id,
        format!("/admin/theaters/{}", theater_id),
        "Failed to delete theater",
    )
    .await
}

/* ---------- USERS ---------- */

async fn list_users(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_get(state, id, "/admin/users".to_string(), "Failed to load users").await
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_delete(
        state,
        id,
        format!("/admin/users/{}", user_id),
        "Failed to delete user",
    )
    .await
}

/* ---------- BOOKINGS & ANALYTICS ---------- */

async fn booking_report(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_get(
        state,
        id,
        "/admin/bookings".to_string(),
        "Failed to load bookings",
    )
    .await
}

async fn booking_stats(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_get(
        state,
        id,
        "/admin/bookings/stats".to_string(),
        "Failed to load booking stats",
    )
    .await
}

async fn revenue_report(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    proxy_get(
        state,
        id,
        "/admin/analytics/revenue".to_string(),
        "Failed to load revenue report",
    )
    .await
}

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::{backend_error, session_gone};
use crate::middleware::SessionId;
use crate::models::RegisterRequest;
use crate::session::AuthSession;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", post(create_session))
        .route("/session", get(get_session))
        .route("/session", delete(close_session))
        .route("/session/register", post(register))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
}

// POST /api/session/register - регистрация нового аккаунта. Сессию не
// трогает: после регистрации пользователь входит обычным login.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please fill in all required fields.".to_string(),
        ));
    }

    let user = state
        .backend
        .register(&req)
        .await
        .map_err(|e| backend_error(e, "Registration failed. Please try again."))?;

    info!("Registered user {} ({})", user.user_id, user.name);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "user": user,
            "message": "Registration successful! Please sign in.",
        })),
    ))
}

// POST /api/session - открыть сессию бронирования
async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = state.sessions.create().await;
    info!("Opened booking session {}", id);
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "sessionId": id })),
    )
}

// GET /api/session - кто сейчас вошёл
async fn get_session(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let body = state
        .sessions
        .with_session(id, |s| {
            serde_json::json!({
                "sessionId": id,
                "signedIn": s.user.is_some(),
                "user": s.user.as_ref().map(|a| &a.user),
                "adminSignedIn": s.admin.is_some(),
                "admin": s.admin.as_ref().map(|a| &a.admin),
            })
        })
        .await
        .ok_or_else(session_gone)?;
    Ok(Json(body))
}

// DELETE /api/session - teardown: вместе с сессией умирает и таймер брони
async fn close_session(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !state.sessions.remove(id).await {
        return Err(session_gone());
    }
    info!("Closed booking session {}", id);
    Ok(Json(serde_json::json!({ "message": "Session closed" })))
}

// POST /api/session/login
#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Email and password are required".to_string(),
        ));
    }

    let response = state
        .backend
        .login(req.email.trim(), &req.password)
        .await
        .map_err(|e| backend_error(e, "Sign in failed. Please try again."))?;

    match (response.token, response.user) {
        (Some(token), Some(user)) => {
            let body = serde_json::json!({
                "user": user,
                "message": response.message.unwrap_or_else(|| "Signed in".to_string()),
            });
            state
                .sessions
                .with_session(id, |s| s.user = Some(AuthSession { token, user }))
                .await
                .ok_or_else(session_gone)?;
            Ok(Json(body))
        }
        _ => Err((
            StatusCode::UNAUTHORIZED,
            response
                .message
                .unwrap_or_else(|| "Invalid email or password".to_string()),
        )),
    }
}

// POST /api/session/logout
async fn logout(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .sessions
        .with_session(id, |s| s.user = None)
        .await
        .ok_or_else(session_gone)?;
    Ok(Json(serde_json::json!({ "message": "Signed out" })))
}

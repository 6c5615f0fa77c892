use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{backend_error, session_gone};
use crate::booking::{DiscountOutcome, FlowError, FlowSnapshot, Step};
use crate::middleware::SessionId;
use crate::models::{BookingRequest, Showtime, Theater};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/flow", get(get_flow))
        .route("/flow", delete(reset_flow))
        .route("/flow/movie", post(select_movie))
        .route("/flow/showtimes", get(list_showtimes))
        .route("/flow/showtime", post(select_showtime))
        .route("/flow/seats/toggle", patch(toggle_seat))
        .route("/flow/discount", post(apply_discount))
        .route("/flow/step", post(go_to_step))
        .route("/flow/submit", post(submit_booking))
}

/* ---------- helpers ---------- */

fn flow_error(err: FlowError) -> (StatusCode, String) {
    let status = match err {
        FlowError::UnknownSeat(_) => StatusCode::NOT_FOUND,
        FlowError::SubmissionInProgress | FlowError::AlreadyCompleted => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

async fn snapshot(state: &Arc<AppState>, id: Uuid) -> Result<FlowSnapshot, (StatusCode, String)> {
    state
        .sessions
        .with_session(id, |s| s.flow.snapshot())
        .await
        .ok_or_else(session_gone)
}

/// Мутация мастера + свежий снимок одним заходом под блокировкой.
async fn mutate(
    state: &Arc<AppState>,
    id: Uuid,
    f: impl FnOnce(&mut crate::booking::BookingFlow) -> Result<(), FlowError>,
) -> Result<FlowSnapshot, (StatusCode, String)> {
    state
        .sessions
        .with_session(id, |s| f(&mut s.flow).map(|_| s.flow.snapshot()))
        .await
        .ok_or_else(session_gone)?
        .map_err(flow_error)
}

/* ---------- WIZARD ---------- */

// GET /api/flow
async fn get_flow(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    Ok(Json(snapshot(&state, id).await?))
}

// DELETE /api/flow - уход со страницы бронирования
async fn reset_flow(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snap = state
        .sessions
        .with_session(id, |s| {
            s.flow.reset();
            s.flow.snapshot()
        })
        .await
        .ok_or_else(session_gone)?;
    Ok(Json(snap))
}

// POST /api/flow/movie
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectMovieRequest {
    movie_id: i64,
}

async fn select_movie(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<SelectMovieRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.movie_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "movieId must be > 0".to_string()));
    }

    let movie = state
        .backend
        .get_movie(req.movie_id)
        .await
        .map_err(|e| backend_error(e, "Failed to load movie details"))?;

    let snap = mutate(&state, id, |flow| flow.select_movie(movie)).await?;
    Ok(Json(snap))
}

// GET /api/flow/showtimes - кинотеатры с сеансами выбранного фильма
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TheaterShowtimes {
    theater: Theater,
    showtimes: Vec<Showtime>,
}

async fn list_showtimes(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movie_id = snapshot(&state, id)
        .await?
        .movie
        .map(|m| m.movie_id)
        .ok_or_else(|| flow_error(FlowError::MovieNotSelected))?;

    let theaters = state
        .backend
        .get_theaters()
        .await
        .map_err(|e| backend_error(e, "Failed to load theaters"))?;

    let mut result = Vec::with_capacity(theaters.len());
    for theater in theaters {
        // один упавший кинотеатр не валит весь список
        match state.backend.get_showtimes(theater.theater_id).await {
            Ok(showtimes) => result.push(TheaterShowtimes {
                theater,
                showtimes: showtimes
                    .into_iter()
                    .filter(|st| st.movie_id == movie_id)
                    .collect(),
            }),
            Err(e) => {
                warn!(
                    "Failed to load showtimes for theater {}: {}",
                    theater.theater_id, e
                );
            }
        }
    }

    Ok(Json(result))
}

// POST /api/flow/showtime
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectShowtimeRequest {
    theater_movie_id: i64,
}

async fn select_showtime(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<SelectShowtimeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.theater_movie_id <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "theaterMovieId must be > 0".to_string(),
        ));
    }

    let movie_id = snapshot(&state, id)
        .await?
        .movie
        .map(|m| m.movie_id)
        .ok_or_else(|| flow_error(FlowError::MovieNotSelected))?;

    // Сеанс ищем заново по каталогу: BFF не кэширует расписание
    let theaters = state
        .backend
        .get_theaters()
        .await
        .map_err(|e| backend_error(e, "Failed to load theaters"))?;

    let mut found: Option<(Showtime, Theater)> = None;
    for theater in theaters {
        let showtimes = match state.backend.get_showtimes(theater.theater_id).await {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(st) = showtimes
            .into_iter()
            .find(|st| st.id == req.theater_movie_id && st.movie_id == movie_id)
        {
            found = Some((st, theater));
            break;
        }
    }

    let (showtime, theater) = found.ok_or((
        StatusCode::NOT_FOUND,
        "Showtime not found for the selected movie".to_string(),
    ))?;

    if showtime.available_seats <= 0 {
        return Err((
            StatusCode::CONFLICT,
            "This showtime is sold out".to_string(),
        ));
    }

    let snap = mutate(&state, id, |flow| {
        flow.select_showtime(showtime, Some(theater))
    })
    .await?;
    Ok(Json(snap))
}

// PATCH /api/flow/seats/toggle
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleSeatRequest {
    seat_id: String,
}

async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<ToggleSeatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snap = mutate(&state, id, |flow| flow.toggle_seat(&req.seat_id)).await?;
    Ok(Json(snap))
}

// POST /api/flow/discount
#[derive(Debug, Deserialize)]
struct ApplyDiscountRequest {
    code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyDiscountResponse {
    outcome: DiscountOutcome,
    flow: FlowSnapshot,
}

async fn apply_discount(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<ApplyDiscountRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (outcome, flow) = state
        .sessions
        .with_session(id, |s| {
            let outcome = s.flow.apply_discount(&req.code);
            (outcome, s.flow.snapshot())
        })
        .await
        .ok_or_else(session_gone)?;
    Ok(Json(ApplyDiscountResponse { outcome, flow }))
}

// POST /api/flow/step - явная навигация между шагами мастера
#[derive(Debug, Deserialize)]
struct GoToStepRequest {
    step: Step,
}

async fn go_to_step(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
    Json(req): Json<GoToStepRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snap = mutate(&state, id, |flow| flow.go_to_step(req.step)).await?;
    Ok(Json(snap))
}

// POST /api/flow/submit - создание бронирования в movie-service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    booking: crate::models::Booking,
    flow: FlowSnapshot,
}

async fn submit_booking(
    State(state): State<Arc<AppState>>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // без входа в аккаунт бронирование не создаётся
    let auth = state
        .sessions
        .with_session(id, |s| s.user.clone())
        .await
        .ok_or_else(session_gone)?
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Please sign in to continue".to_string(),
        ))?;

    let payload = state
        .sessions
        .with_session(id, |s| s.flow.begin_submit())
        .await
        .ok_or_else(session_gone)?
        .map_err(flow_error)?;

    let request = BookingRequest {
        user_id: auth.user.user_id,
        theater_movie_id: payload.theater_movie_id,
        number_of_seats: payload.number_of_seats,
        price_per_ticket: payload.price_per_ticket,
        discount_code: payload.discount_code,
    };

    match state.backend.create_booking(&auth.token, &request).await {
        Ok(booking) => {
            let flow = state
                .sessions
                .with_session(id, |s| {
                    s.flow.complete(booking.booking_id);
                    s.flow.snapshot()
                })
                .await
                .ok_or_else(session_gone)?;

            info!(
                "Booking {} created for session {} ({} seats)",
                booking.booking_id, id, booking.number_of_seats
            );
            Ok((StatusCode::CREATED, Json(SubmitResponse { booking, flow })))
        }
        Err(e) => {
            // остаёмся на шаге Review, даём пользователю повторить вручную
            let _ = state
                .sessions
                .with_session(id, |s| s.flow.fail_submit())
                .await;
            Err(backend_error(e, "Failed to create booking. Please try again."))
        }
    }
}

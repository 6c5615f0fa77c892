use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::backend_error;
use crate::AppState;

// Каталог читается без авторизации и просто проксируется из movie-service
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{movie_id}", get(get_movie))
        .route("/theaters", get(list_theaters))
        .route("/theaters/{theater_id}/showtimes", get(list_showtimes))
        .route(
            "/recommendations/user/{user_id}/{algorithm}",
            get(recommendations),
        )
}

async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movies = state
        .backend
        .get_movies()
        .await
        .map_err(|e| backend_error(e, "Failed to load movies"))?;
    Ok(Json(movies))
}

async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if movie_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "movieId must be > 0".to_string()));
    }
    let movie = state
        .backend
        .get_movie(movie_id)
        .await
        .map_err(|e| backend_error(e, "Failed to load movie details"))?;
    Ok(Json(movie))
}

async fn list_theaters(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let theaters = state
        .backend
        .get_theaters()
        .await
        .map_err(|e| backend_error(e, "Failed to load theaters"))?;
    Ok(Json(theaters))
}

async fn list_showtimes(
    State(state): State<Arc<AppState>>,
    Path(theater_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if theater_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "theaterId must be > 0".to_string()));
    }
    let showtimes = state
        .backend
        .get_showtimes(theater_id)
        .await
        .map_err(|e| backend_error(e, "Failed to load showtimes"))?;
    Ok(Json(showtimes))
}

// GET /api/recommendations/user/{user_id}/{algorithm}?limit=10 -
// прокси к рекомендательному шлюзу movie-service
const RECOMMENDATION_ALGORITHMS: [&str; 3] = ["collaborative", "content-based", "hybrid"];

#[derive(Debug, Deserialize)]
struct RecommendationsQuery {
    limit: Option<u32>,
}

async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path((user_id, algorithm)): Path<(i64, String)>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if user_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "userId must be > 0".to_string()));
    }
    if !RECOMMENDATION_ALGORITHMS.contains(&algorithm.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown recommendation algorithm: {}", algorithm),
        ));
    }

    let recs = state
        .backend
        .get_recommendations(user_id, &algorithm, query.limit.unwrap_or(10))
        .await
        .map_err(|e| {
            backend_error(
                e,
                "Failed to load recommendations. Try rating some movies first.",
            )
        })?;
    Ok(Json(recs))
}

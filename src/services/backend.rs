//! backend.rs
//!
//! Клиент movie-service. Это единственная сетевая граница приложения:
//! каталог, авторизация, создание бронирований и админский CRUD - всё
//! уходит сюда обычными REST-вызовами с JSON-телами. Ответы бэкенда
//! не интерпретируются сверх необходимого: админские данные вообще
//! пробрасываются как непрозрачный JSON.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Duration;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::models::{
    AdminLoginResponse, Booking, BookingRequest, LoginResponse, Movie, RegisterRequest, Showtime,
    Theater, User,
};

#[derive(Debug, Error)]
pub enum BackendError {
    /// Транспортная ошибка: сервис недоступен или не ответил за таймаут
    #[error("movie service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// Сервис ответил ошибкой; message - из тела ответа, если оно есть
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

/// Клиент для REST API movie-service.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::builder()
                // Таймаут, чтобы зависший вызов не блокировал кнопку навсегда
                .timeout(Duration::from_secs(config.request_timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /* ---------- CATALOG (без авторизации) ---------- */

    pub async fn get_movies(&self) -> Result<Vec<Movie>, BackendError> {
        self.get_json("/movies", None).await
    }

    pub async fn get_movie(&self, movie_id: i64) -> Result<Movie, BackendError> {
        self.get_json(&format!("/movies/{}", movie_id), None).await
    }

    pub async fn get_theaters(&self) -> Result<Vec<Theater>, BackendError> {
        self.get_json("/theaters", None).await
    }

    pub async fn get_showtimes(&self, theater_id: i64) -> Result<Vec<Showtime>, BackendError> {
        self.get_json(&format!("/theater-movies/theater/{}", theater_id), None)
            .await
    }

    /* ---------- AUTH & BOOKINGS ---------- */

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError> {
        self.send_json(
            Method::POST,
            "/auth/login",
            None,
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, BackendError> {
        self.send_json(Method::POST, "/auth/register", None, request)
            .await
    }

    pub async fn create_booking(
        &self,
        token: &str,
        request: &BookingRequest,
    ) -> Result<Booking, BackendError> {
        self.send_json(Method::POST, "/bookings", Some(token), request)
            .await
    }

    pub async fn get_booking(&self, token: &str, booking_id: i64) -> Result<Booking, BackendError> {
        self.get_json(&format!("/bookings/{}", booking_id), Some(token))
            .await
    }

    pub async fn get_user_bookings(
        &self,
        token: &str,
        user_id: i64,
    ) -> Result<Vec<Booking>, BackendError> {
        self.get_json(&format!("/bookings/user/{}", user_id), Some(token))
            .await
    }

    pub async fn cancel_booking(
        &self,
        token: &str,
        booking_id: i64,
    ) -> Result<Booking, BackendError> {
        self.send_json(
            Method::PUT,
            &format!("/bookings/{}/cancel", booking_id),
            Some(token),
            &serde_json::json!({}),
        )
        .await
    }

    /* ---------- RECOMMENDATIONS (шлюз movie-service) ---------- */

    pub async fn get_recommendations(
        &self,
        user_id: i64,
        algorithm: &str,
        limit: u32,
    ) -> Result<Value, BackendError> {
        self.get_json(
            &format!(
                "/api/recommendations/user/{}/{}?limit={}",
                user_id, algorithm, limit
            ),
            None,
        )
        .await
    }

    /* ---------- ADMIN (bearer token, непрозрачный JSON) ---------- */

    pub async fn admin_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, BackendError> {
        self.send_json(
            Method::POST,
            "/admin/login",
            None,
            &serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn admin_get(&self, token: &str, path: &str) -> Result<Value, BackendError> {
        self.get_json(path, Some(token)).await
    }

    pub async fn admin_send(
        &self,
        token: &str,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Value, BackendError> {
        self.send_json(method, path, Some(token), body).await
    }

    pub async fn admin_delete(&self, token: &str, path: &str) -> Result<(), BackendError> {
        let response = self
            .http_client
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // тело DELETE-ответа может быть пустым
            return Ok(());
        }
        Err(Self::rejection(status, response).await)
    }

    /* ---------- helpers ---------- */

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        let mut request = self.http_client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::parse(request.send().await?).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::parse(request.send().await?).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        Err(Self::rejection(status, response).await)
    }

    /// movie-service кладёт описание ошибки в поле "message" тела ответа
    async fn rejection(status: StatusCode, response: reqwest::Response) -> BackendError {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| {
                format!("Movie service request failed with status {}", status.as_u16())
            });
        BackendError::Rejected { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> BackendClient {
        BackendClient::from_config(&BackendConfig {
            base_url: server.uri(),
            request_timeout_seconds: 5,
        })
    }

    #[tokio::test]
    async fn create_booking_sends_bearer_token_and_parses_record() {
        let server = MockServer::start().await;

        let request = BookingRequest {
            user_id: 5,
            theater_movie_id: 42,
            number_of_seats: 3,
            price_per_ticket: 150.0,
            discount_code: Some("SAVE10".to_string()),
        };

        Mock::given(method("POST"))
            .and(path("/bookings"))
            .and(header("authorization", "Bearer jwt-token"))
            .and(body_json(json!({
                "userId": 5,
                "theaterMovieId": 42,
                "numberOfSeats": 3,
                "pricePerTicket": 150.0,
                "discountCode": "SAVE10"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "bookingId": 1234,
                "userId": 5,
                "theaterMovieId": 42,
                "numberOfSeats": 3,
                "basePrice": 450.0,
                "taxAmount": 72.9,
                "serviceCharge": 20.25,
                "discountAmount": 45.0,
                "totalPrice": 498.15,
                "pricePerTicket": 150.0,
                "bookingTime": "2025-06-01T19:45:00",
                "status": "CONFIRMED",
                "reservationExpiresAt": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let booking = client(&server)
            .create_booking("jwt-token", &request)
            .await
            .unwrap();

        assert_eq!(booking.booking_id, 1234);
        assert_eq!(booking.status, "CONFIRMED");
        assert!((booking.total_price - 498.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn rejection_surfaces_backend_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bookings"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "message": "Not enough seats available" })),
            )
            .mount(&server)
            .await;

        let request = BookingRequest {
            user_id: 5,
            theater_movie_id: 42,
            number_of_seats: 3,
            price_per_ticket: 150.0,
            discount_code: None,
        };

        let err = client(&server)
            .create_booking("jwt-token", &request)
            .await
            .unwrap_err();

        match err {
            BackendError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(message, "Not enough seats available");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejection_without_message_gets_generic_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/7"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).get_movie(7).await.unwrap_err();
        match err {
            BackendError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Movie service request failed with status 500");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn get_showtimes_hits_theater_movies_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/theater-movies/theater/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 42,
                "theaterId": 3,
                "movieId": 7,
                "screenNumber": 1,
                "showTime": "2025-06-01T20:00:00",
                "ticketPrice": 150.0,
                "dynamicPrice": 180.0,
                "availableSeats": 88,
                "totalSeats": 100
            }])))
            .mount(&server)
            .await;

        let showtimes = client(&server).get_showtimes(3).await.unwrap();
        assert_eq!(showtimes.len(), 1);
        assert_eq!(showtimes[0].id, 42);
        assert!((showtimes[0].effective_price() - 180.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn register_posts_user_payload_without_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "phone": "",
                "password": "secret"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "userID": 5,
                "name": "Ada",
                "email": "ada@example.com",
                "phone": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client(&server)
            .register(&RegisterRequest {
                user_id: None,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: String::new(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.user_id, 5);
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn user_bookings_are_fetched_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bookings/user/5"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "bookingId": 1234,
                "userId": 5,
                "theaterMovieId": 42,
                "numberOfSeats": 2,
                "basePrice": 300.0,
                "taxAmount": 54.0,
                "serviceCharge": 15.0,
                "discountAmount": 0.0,
                "totalPrice": 369.0,
                "pricePerTicket": 150.0,
                "bookingTime": "2025-06-01T19:45:00",
                "status": "CONFIRMED",
                "reservationExpiresAt": null
            }])))
            .mount(&server)
            .await;

        let bookings = client(&server)
            .get_user_bookings("jwt-token", 5)
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].booking_id, 1234);
    }

    #[tokio::test]
    async fn cancel_booking_puts_to_cancel_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/bookings/1234/cancel"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bookingId": 1234,
                "userId": 5,
                "theaterMovieId": 42,
                "numberOfSeats": 2,
                "basePrice": 300.0,
                "taxAmount": 54.0,
                "serviceCharge": 15.0,
                "discountAmount": 0.0,
                "totalPrice": 369.0,
                "pricePerTicket": 150.0,
                "bookingTime": "2025-06-01T19:45:00",
                "status": "CANCELLED",
                "reservationExpiresAt": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let booking = client(&server)
            .cancel_booking("jwt-token", 1234)
            .await
            .unwrap();
        assert_eq!(booking.status, "CANCELLED");
    }

    #[tokio::test]
    async fn recommendations_hit_gateway_with_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/recommendations/user/5/hybrid"))
            .and(query_param("limit", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "movieId": 7, "score": 0.92 }])),
            )
            .mount(&server)
            .await;

        let recs = client(&server)
            .get_recommendations(5, "hybrid", 10)
            .await
            .unwrap();
        assert_eq!(recs[0]["movieId"], 7);
    }

    #[tokio::test]
    async fn admin_delete_accepts_empty_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/admin/movies/7"))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        client(&server)
            .admin_delete("admin-token", "/admin/movies/7")
            .await
            .unwrap();
    }
}

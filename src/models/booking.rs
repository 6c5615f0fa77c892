use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Тело POST /bookings в movie-service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: i64,
    pub theater_movie_id: i64,
    pub number_of_seats: u32,
    pub price_per_ticket: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

// Запись бронирования, которую возвращает movie-service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: i64,
    pub user_id: i64,
    pub theater_movie_id: i64,
    pub number_of_seats: u32,
    pub base_price: f64,
    pub tax_amount: f64,
    pub service_charge: f64,
    pub discount_amount: f64,
    pub total_price: f64,
    pub price_per_ticket: f64,
    pub booking_time: NaiveDateTime,
    pub status: String,
    pub reservation_expires_at: Option<NaiveDateTime>,
}

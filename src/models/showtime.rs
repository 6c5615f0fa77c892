use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Сеанс фильма в зале кинотеатра (в API movie-service это "theater movie")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: i64,
    pub theater_id: i64,
    pub movie_id: i64,
    pub screen_number: i32,
    pub show_time: NaiveDateTime,
    pub ticket_price: f64,
    pub dynamic_price: Option<f64>,
    pub available_seats: i32,
    pub total_seats: i32,
}

impl Showtime {
    // Динамическая цена имеет приоритет над базовой
    pub fn effective_price(&self) -> f64 {
        self.dynamic_price.unwrap_or(self.ticket_price)
    }
}

use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки внешнего movie-service API
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

// Настройки booking flow (таймер брони, сетка мест, промокод)
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub hold_seconds: u32,
    pub seat_rows: usize,
    pub seats_per_row: usize,
    pub discount_code: String,
    pub session_idle_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "movie_booking=debug,tower_http=debug".to_string()),
            },
            backend: BackendConfig {
                base_url: env::var("MOVIE_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                request_timeout_seconds: env::var("MOVIE_SERVICE_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("MOVIE_SERVICE_TIMEOUT_SECONDS must be a valid number"),
            },
            booking: BookingConfig {
                hold_seconds: env::var("SEAT_HOLD_SECONDS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .expect("SEAT_HOLD_SECONDS must be a valid number"),
                seat_rows: env::var("SEAT_ROWS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("SEAT_ROWS must be a valid number"),
                seats_per_row: env::var("SEATS_PER_ROW")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("SEATS_PER_ROW must be a valid number"),
                discount_code: env::var("DISCOUNT_CODE").unwrap_or_else(|_| "SAVE10".to_string()),
                session_idle_seconds: env::var("SESSION_IDLE_SECONDS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse()
                    .expect("SESSION_IDLE_SECONDS must be a valid number"),
            },
        }
    }
}

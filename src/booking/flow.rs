//! flow.rs
//!
//! Линейный мастер бронирования: фильм -> сеанс -> места -> подтверждение.
//! Вся логика синхронная и живёт в памяти одной сессии; единственное
//! "параллельное" событие - секундный тик таймера брони, который гонится
//! с действиями пользователя и разрешается инвариантом: таймер активен
//! тогда и только тогда, когда выбрано хотя бы одно место.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::booking::pricing::{self, DiscountOutcome, PriceBreakdown};
use crate::booking::seats::{Seat, SeatGrid, ToggleResult};
use crate::config::BookingConfig;
use crate::models::{Movie, Showtime, Theater};

pub const HOLD_EXPIRED_MESSAGE: &str = "Seat reservation expired. Please select seats again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Movie,
    Showtime,
    Seats,
    Review,
    Completed,
}

impl Step {
    fn index(self) -> u8 {
        match self {
            Step::Movie => 1,
            Step::Showtime => 2,
            Step::Seats => 3,
            Step::Review => 4,
            Step::Completed => 5,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Please select a movie to start booking")]
    MovieNotSelected,
    #[error("Please select a showtime first")]
    ShowtimeNotSelected,
    #[error("Please select at least one seat")]
    NoSeatsSelected,
    #[error("Unknown seat: {0}")]
    UnknownSeat(String),
    #[error("Please complete all booking details")]
    IncompleteBooking,
    #[error("Booking creation already in progress")]
    SubmissionInProgress,
    #[error("Booking already completed")]
    AlreadyCompleted,
}

/// Данные для POST /bookings, собранные из состояния мастера.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPayload {
    pub theater_movie_id: i64,
    pub number_of_seats: u32,
    pub price_per_ticket: f64,
    pub discount_code: Option<String>,
}

/// Снимок состояния мастера, который отдаётся клиенту.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub step: Step,
    pub movie: Option<Movie>,
    pub theater: Option<Theater>,
    pub showtime: Option<Showtime>,
    pub seats: Vec<Seat>,
    pub selected_seats: Vec<String>,
    pub discount_code: String,
    pub discount_message: Option<String>,
    pub price_breakdown: Option<PriceBreakdown>,
    pub hold_seconds_remaining: u32,
    pub notice: Option<String>,
    pub submitting: bool,
    pub booking_id: Option<i64>,
}

pub struct BookingFlow {
    step: Step,
    movie: Option<Movie>,
    theater: Option<Theater>,
    showtime: Option<Showtime>,
    grid: Option<SeatGrid>,
    discount_code: String,
    discount_message: Option<String>,
    price: Option<PriceBreakdown>,
    // секунд до истечения брони; 0 = таймер не активен
    hold_remaining: u32,
    notice: Option<String>,
    submitting: bool,
    booking_id: Option<i64>,
    hold_seconds: u32,
    seat_rows: usize,
    seats_per_row: usize,
    recognized_code: String,
}

impl BookingFlow {
    pub fn new(cfg: &BookingConfig) -> Self {
        Self {
            step: Step::Movie,
            movie: None,
            theater: None,
            showtime: None,
            grid: None,
            discount_code: String::new(),
            discount_message: None,
            price: None,
            hold_remaining: 0,
            notice: None,
            submitting: false,
            booking_id: None,
            hold_seconds: cfg.hold_seconds,
            seat_rows: cfg.seat_rows,
            seats_per_row: cfg.seats_per_row,
            recognized_code: cfg.discount_code.clone(),
        }
    }

    /// Полный сброс мастера (уход со страницы бронирования).
    pub fn reset(&mut self) {
        let recognized_code = std::mem::take(&mut self.recognized_code);
        *self = Self {
            step: Step::Movie,
            movie: None,
            theater: None,
            showtime: None,
            grid: None,
            discount_code: String::new(),
            discount_message: None,
            price: None,
            hold_remaining: 0,
            notice: None,
            submitting: false,
            booking_id: None,
            hold_seconds: self.hold_seconds,
            seat_rows: self.seat_rows,
            seats_per_row: self.seats_per_row,
            recognized_code,
        };
    }

    /// Выбор фильма. Сбрасывает всё, что зависело от предыдущего фильма,
    /// и переводит мастер на шаг выбора сеанса.
    pub fn select_movie(&mut self, movie: Movie) -> Result<(), FlowError> {
        if self.step == Step::Completed {
            return Err(FlowError::AlreadyCompleted);
        }
        self.movie = Some(movie);
        self.theater = None;
        self.showtime = None;
        self.grid = None;
        self.price = None;
        self.hold_remaining = 0;
        self.notice = None;
        self.step = Step::Showtime;
        Ok(())
    }

    /// Выбор сеанса: пересоздаёт сетку мест и переводит на шаг выбора мест.
    pub fn select_showtime(
        &mut self,
        showtime: Showtime,
        theater: Option<Theater>,
    ) -> Result<(), FlowError> {
        if self.step == Step::Completed {
            return Err(FlowError::AlreadyCompleted);
        }
        if self.movie.is_none() {
            return Err(FlowError::MovieNotSelected);
        }
        self.grid = Some(SeatGrid::for_showtime(
            &showtime,
            self.seat_rows,
            self.seats_per_row,
        ));
        self.showtime = Some(showtime);
        self.theater = theater;
        self.price = None;
        self.hold_remaining = 0;
        self.notice = None;
        self.step = Step::Seats;
        Ok(())
    }

    /// Переключение места. Занятые места молча игнорируются. Управляет
    /// таймером брони: первое выбранное место запускает отсчёт, снятие
    /// последнего - останавливает.
    pub fn toggle_seat(&mut self, seat_id: &str) -> Result<(), FlowError> {
        if self.step == Step::Completed {
            return Err(FlowError::AlreadyCompleted);
        }
        let grid = self.grid.as_mut().ok_or(FlowError::ShowtimeNotSelected)?;

        match grid.toggle(seat_id) {
            None => return Err(FlowError::UnknownSeat(seat_id.to_string())),
            Some(ToggleResult::Unavailable) => return Ok(()),
            Some(_) => {}
        }

        self.notice = None;

        let selected = grid.selected_count();
        if selected > 0 && self.hold_remaining == 0 {
            self.hold_remaining = self.hold_seconds;
        } else if selected == 0 {
            self.hold_remaining = 0;
        }

        self.recalculate_price();
        Ok(())
    }

    /// Применение промокода. Пустой ввод - тихий no-op. Код проверяется
    /// прямо здесь: сообщение о валидности не зависит от того, выбраны
    /// ли уже места и есть ли разбивка цены.
    pub fn apply_discount(&mut self, code: &str) -> DiscountOutcome {
        self.discount_code = code.trim().to_string();
        if self.discount_code.is_empty() {
            self.discount_message = None;
            self.recalculate_price();
            return DiscountOutcome::NotRequested;
        }

        let outcome = if self.discount_code.eq_ignore_ascii_case(&self.recognized_code) {
            DiscountOutcome::Applied
        } else {
            DiscountOutcome::Invalid
        };
        self.discount_message = match outcome {
            DiscountOutcome::Applied => Some("Discount code applied!".to_string()),
            DiscountOutcome::Invalid => Some("Invalid discount code".to_string()),
            DiscountOutcome::NotRequested => None,
        };
        self.recalculate_price();
        outcome
    }

    /// Явная навигация по шагам. Назад - всегда можно, и выбранное не
    /// сбрасывается; вперёд - только если предыдущие шаги завершены.
    pub fn go_to_step(&mut self, target: Step) -> Result<(), FlowError> {
        if self.step == Step::Completed {
            return Err(FlowError::AlreadyCompleted);
        }
        if target == Step::Completed {
            // терминальный шаг достижим только через успешное бронирование
            return Err(FlowError::IncompleteBooking);
        }

        if target.index() > self.step.index() {
            match target {
                Step::Showtime if self.movie.is_none() => {
                    return Err(FlowError::MovieNotSelected)
                }
                Step::Seats if self.showtime.is_none() => {
                    return Err(FlowError::ShowtimeNotSelected)
                }
                Step::Review => {
                    if self.movie.is_none() {
                        return Err(FlowError::MovieNotSelected);
                    }
                    if self.showtime.is_none() {
                        return Err(FlowError::ShowtimeNotSelected);
                    }
                    if self.selected_count() == 0 {
                        return Err(FlowError::NoSeatsSelected);
                    }
                }
                _ => {}
            }
        }

        self.step = target;
        if target == Step::Review {
            self.recalculate_price();
        }
        Ok(())
    }

    /// Секундный тик таймера брони. Возвращает освобождённые места,
    /// если отсчёт дошёл до нуля.
    pub fn tick(&mut self) -> Option<Vec<String>> {
        if self.step == Step::Completed || self.hold_remaining == 0 {
            return None;
        }

        self.hold_remaining -= 1;
        if self.hold_remaining > 0 {
            return None;
        }

        let released = self
            .grid
            .as_mut()
            .map(|g| g.release_selected())
            .unwrap_or_default();
        self.price = None;
        self.notice = Some(HOLD_EXPIRED_MESSAGE.to_string());
        Some(released)
    }

    /// Подготовка запроса на создание бронирования. Повторный вызов до
    /// завершения предыдущего отклоняется - кнопка "забронировать"
    /// блокируется до ответа бэкенда.
    pub fn begin_submit(&mut self) -> Result<SubmitPayload, FlowError> {
        if self.step == Step::Completed {
            return Err(FlowError::AlreadyCompleted);
        }
        if self.submitting {
            return Err(FlowError::SubmissionInProgress);
        }

        let showtime = match (&self.movie, &self.showtime) {
            (Some(_), Some(st)) => st,
            _ => return Err(FlowError::IncompleteBooking),
        };
        let number_of_seats = self.selected_count() as u32;
        if number_of_seats == 0 {
            return Err(FlowError::IncompleteBooking);
        }

        self.submitting = true;
        self.notice = None;
        Ok(SubmitPayload {
            theater_movie_id: showtime.id,
            number_of_seats,
            price_per_ticket: showtime.effective_price(),
            discount_code: if self.discount_code.is_empty() {
                None
            } else {
                Some(self.discount_code.clone())
            },
        })
    }

    /// Бронирование создано: останавливаем таймер, фиксируем id.
    pub fn complete(&mut self, booking_id: i64) {
        self.submitting = false;
        self.booking_id = Some(booking_id);
        self.hold_remaining = 0;
        self.step = Step::Completed;
    }

    /// Бэкенд отклонил запрос: остаёмся на шаге Review, снимаем блокировку.
    pub fn fail_submit(&mut self) {
        self.submitting = false;
    }

    fn recalculate_price(&mut self) -> DiscountOutcome {
        let (showtime, seats) = match (&self.showtime, self.selected_count()) {
            (Some(st), n) if n > 0 => (st, n as u32),
            _ => {
                self.price = None;
                return DiscountOutcome::NotRequested;
            }
        };

        let code = if self.discount_code.is_empty() {
            None
        } else {
            Some(self.discount_code.as_str())
        };
        let (breakdown, outcome) = pricing::calculate(
            showtime.effective_price(),
            seats,
            code,
            &self.recognized_code,
        );
        self.price = Some(breakdown);
        outcome
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selected_count(&self) -> usize {
        self.grid.as_ref().map(|g| g.selected_count()).unwrap_or(0)
    }

    pub fn hold_remaining(&self) -> u32 {
        self.hold_remaining
    }

    pub fn hold_active(&self) -> bool {
        self.hold_remaining > 0
    }

    pub fn price(&self) -> Option<&PriceBreakdown> {
        self.price.as_ref()
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            step: self.step,
            movie: self.movie.clone(),
            theater: self.theater.clone(),
            showtime: self.showtime.clone(),
            seats: self
                .grid
                .as_ref()
                .map(|g| g.seats().to_vec())
                .unwrap_or_default(),
            selected_seats: self
                .grid
                .as_ref()
                .map(|g| g.selected_ids().to_vec())
                .unwrap_or_default(),
            discount_code: self.discount_code.clone(),
            discount_message: self.discount_message.clone(),
            price_breakdown: self.price,
            hold_seconds_remaining: self.hold_remaining,
            notice: self.notice.clone(),
            submitting: self.submitting,
            booking_id: self.booking_id,
        }
    }
}

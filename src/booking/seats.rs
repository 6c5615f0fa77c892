use serde::Serialize;

use crate::models::Showtime;

/// Статус места. Место всегда находится ровно в одном из четырёх состояний.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
    Reserved,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub row: char,
    pub column: u32,
    pub status: SeatStatus,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResult {
    Selected,
    Deselected,
    /// Место уже занято (booked/reserved) - переключение игнорируется
    Unavailable,
}

/// Сетка мест для выбранного сеанса. Живёт только внутри текущей сессии
/// бронирования и пересоздаётся при каждой смене сеанса.
#[derive(Debug, Clone)]
pub struct SeatGrid {
    seats: Vec<Seat>,
    // порядок выбора сохраняется - он же порядок отображения в сводке
    selected: Vec<String>,
}

impl SeatGrid {
    /// Строит сетку фиксированного размера для сеанса. Первые
    /// `total_seats - available_seats` мест помечаются как занятые по порядку
    /// индексов: movie-service не отдаёт статусы конкретных мест, только
    /// счётчики, так что реальную раскладку мы не знаем.
    pub fn for_showtime(showtime: &Showtime, rows: usize, seats_per_row: usize) -> Self {
        let rows = rows.min(26); // ряды помечаются буквами A-Z
        let booked = (showtime.total_seats - showtime.available_seats).max(0) as usize;
        let price = showtime.effective_price();

        let mut seats = Vec::with_capacity(rows * seats_per_row);
        for r in 0..rows {
            let row = (b'A' + r as u8) as char;
            for c in 1..=seats_per_row {
                let index = r * seats_per_row + (c - 1);
                seats.push(Seat {
                    id: format!("{}{}", row, c),
                    row,
                    column: c as u32,
                    status: if index < booked {
                        SeatStatus::Booked
                    } else {
                        SeatStatus::Available
                    },
                    price,
                });
            }
        }

        Self {
            seats,
            selected: Vec::new(),
        }
    }

    /// Переключает место между available и selected. Возвращает `None`,
    /// если места с таким id нет в сетке.
    pub fn toggle(&mut self, seat_id: &str) -> Option<ToggleResult> {
        let seat = self.seats.iter_mut().find(|s| s.id == seat_id)?;

        match seat.status {
            SeatStatus::Booked | SeatStatus::Reserved => Some(ToggleResult::Unavailable),
            SeatStatus::Available => {
                seat.status = SeatStatus::Selected;
                self.selected.push(seat_id.to_string());
                Some(ToggleResult::Selected)
            }
            SeatStatus::Selected => {
                seat.status = SeatStatus::Available;
                self.selected.retain(|id| id != seat_id);
                Some(ToggleResult::Deselected)
            }
        }
    }

    /// Освобождает все выбранные места (истечение таймера брони).
    /// Возвращает id освобождённых мест.
    pub fn release_selected(&mut self) -> Vec<String> {
        for seat in self.seats.iter_mut() {
            if seat.status == SeatStatus::Selected {
                seat.status = SeatStatus::Available;
            }
        }
        std::mem::take(&mut self.selected)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showtime(total: i32, available: i32) -> Showtime {
        Showtime {
            id: 1,
            theater_id: 1,
            movie_id: 1,
            screen_number: 2,
            show_time: chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            ticket_price: 150.0,
            dynamic_price: None,
            available_seats: available,
            total_seats: total,
        }
    }

    #[test]
    fn grid_marks_booked_seats_by_index_order() {
        let grid = SeatGrid::for_showtime(&showtime(100, 88), 10, 10);
        assert_eq!(grid.seats().len(), 100);

        let booked: Vec<&str> = grid
            .seats()
            .iter()
            .filter(|s| s.status == SeatStatus::Booked)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(booked.len(), 12);
        // первые 12 мест по порядку индексов: ряд A целиком + A... B1, B2
        assert_eq!(booked[0], "A1");
        assert_eq!(booked[9], "A10");
        assert_eq!(booked[11], "B2");
    }

    #[test]
    fn grid_never_books_more_than_counters_say() {
        // available > total не должно давать отрицательное число занятых
        let grid = SeatGrid::for_showtime(&showtime(50, 80), 10, 10);
        assert!(grid.seats().iter().all(|s| s.status == SeatStatus::Available));
    }

    #[test]
    fn toggle_roundtrip_restores_prior_state() {
        let mut grid = SeatGrid::for_showtime(&showtime(100, 100), 10, 10);

        assert_eq!(grid.toggle("C5"), Some(ToggleResult::Selected));
        assert_eq!(grid.selected_ids(), &["C5".to_string()]);

        assert_eq!(grid.toggle("C5"), Some(ToggleResult::Deselected));
        assert_eq!(grid.selected_count(), 0);
        assert!(grid.seats().iter().all(|s| s.status != SeatStatus::Selected));
    }

    #[test]
    fn toggle_booked_seat_is_ignored() {
        let mut grid = SeatGrid::for_showtime(&showtime(100, 90), 10, 10);

        assert_eq!(grid.toggle("A1"), Some(ToggleResult::Unavailable));
        assert_eq!(grid.selected_count(), 0);
        assert_eq!(grid.seats()[0].status, SeatStatus::Booked);
    }

    #[test]
    fn toggle_unknown_seat_returns_none() {
        let mut grid = SeatGrid::for_showtime(&showtime(100, 100), 10, 10);
        assert_eq!(grid.toggle("Z99"), None);
    }

    #[test]
    fn selection_order_is_preserved() {
        let mut grid = SeatGrid::for_showtime(&showtime(100, 100), 10, 10);
        grid.toggle("B7");
        grid.toggle("A3");
        grid.toggle("J10");
        assert_eq!(grid.selected_ids(), &["B7", "A3", "J10"]);

        let selected_in_grid = grid
            .seats()
            .iter()
            .filter(|s| s.status == SeatStatus::Selected)
            .count();
        assert_eq!(selected_in_grid, grid.selected_count());
    }

    #[test]
    fn release_selected_clears_everything() {
        let mut grid = SeatGrid::for_showtime(&showtime(100, 100), 10, 10);
        grid.toggle("A1");
        grid.toggle("A2");

        let released = grid.release_selected();
        assert_eq!(released, vec!["A1".to_string(), "A2".to_string()]);
        assert_eq!(grid.selected_count(), 0);
        assert!(grid.seats().iter().all(|s| s.status == SeatStatus::Available));
    }
}

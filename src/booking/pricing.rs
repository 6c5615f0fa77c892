use serde::Serialize;

// Ставки зафиксированы контрактом movie-service
pub const TAX_RATE: f64 = 0.18; // GST
pub const SERVICE_CHARGE_RATE: f64 = 0.05;
pub const DISCOUNT_RATE: f64 = 0.10;

/// Разбивка цены. Всегда пересчитывается заново, нигде не хранится
/// независимо от входных данных.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub discount_amount: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub service_charge: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountOutcome {
    /// Код не вводился (пустая строка) - скидки нет, без сообщений
    NotRequested,
    Applied,
    Invalid,
}

/// Чистый расчёт: (цена билета, число мест, промокод) -> разбивка.
/// Промокод сверяется без учёта регистра с единственным известным кодом.
pub fn calculate(
    price_per_ticket: f64,
    number_of_seats: u32,
    discount_code: Option<&str>,
    recognized_code: &str,
) -> (PriceBreakdown, DiscountOutcome) {
    let base_price = price_per_ticket * number_of_seats as f64;

    let (discount_amount, outcome) = match discount_code.map(str::trim) {
        None | Some("") => (0.0, DiscountOutcome::NotRequested),
        Some(code) if code.eq_ignore_ascii_case(recognized_code) => {
            (base_price * DISCOUNT_RATE, DiscountOutcome::Applied)
        }
        Some(_) => (0.0, DiscountOutcome::Invalid),
    };

    let subtotal = base_price - discount_amount;
    let tax_amount = subtotal * TAX_RATE;
    let service_charge = subtotal * SERVICE_CHARGE_RATE;

    (
        PriceBreakdown {
            base_price,
            discount_amount,
            subtotal,
            tax_amount,
            service_charge,
            total_price: subtotal + tax_amount + service_charge,
        },
        outcome,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CODE: &str = "SAVE10";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn no_discount_breakdown() {
        let (b, outcome) = calculate(150.0, 3, None, CODE);
        assert_eq!(outcome, DiscountOutcome::NotRequested);
        assert_close(b.base_price, 450.0);
        assert_close(b.discount_amount, 0.0);
        assert_close(b.subtotal, 450.0);
        assert_close(b.tax_amount, 81.0);
        assert_close(b.service_charge, 22.5);
        assert_close(b.total_price, 553.5);
    }

    #[test]
    fn recognized_code_takes_ten_percent_off_base() {
        let (b, outcome) = calculate(150.0, 3, Some("SAVE10"), CODE);
        assert_eq!(outcome, DiscountOutcome::Applied);
        assert_close(b.discount_amount, 45.0);
        assert_close(b.subtotal, 405.0);
        assert_close(b.tax_amount, 72.9);
        assert_close(b.service_charge, 20.25);
        assert_close(b.total_price, 498.15);
    }

    #[test]
    fn code_match_is_case_insensitive() {
        let (b, outcome) = calculate(100.0, 1, Some("save10"), CODE);
        assert_eq!(outcome, DiscountOutcome::Applied);
        assert_close(b.discount_amount, 10.0);
    }

    #[test]
    fn unrecognized_code_is_invalid_with_zero_discount() {
        let (b, outcome) = calculate(150.0, 3, Some("SAVE50"), CODE);
        assert_eq!(outcome, DiscountOutcome::Invalid);
        assert_close(b.discount_amount, 0.0);
        assert_close(b.total_price, 553.5);
    }

    #[test]
    fn empty_code_is_silently_ignored() {
        let (b, outcome) = calculate(150.0, 3, Some(""), CODE);
        assert_eq!(outcome, DiscountOutcome::NotRequested);
        assert_close(b.discount_amount, 0.0);
    }

    #[test]
    fn discount_outcome_serializes_in_camel_case() {
        assert_eq!(
            serde_json::to_value(DiscountOutcome::Invalid).unwrap(),
            serde_json::json!("invalid")
        );
        assert_eq!(
            serde_json::to_value(DiscountOutcome::NotRequested).unwrap(),
            serde_json::json!("notRequested")
        );
    }

    #[test]
    fn zero_seats_cost_nothing() {
        let (b, _) = calculate(150.0, 0, None, CODE);
        assert_close(b.base_price, 0.0);
        assert_close(b.total_price, 0.0);
    }

    proptest! {
        // Без скидки итог всегда p * n * 1.23 (18% налог + 5% сбор на subtotal)
        #[test]
        fn total_without_discount_is_base_times_123_percent(
            price in 0.0f64..10_000.0,
            seats in 0u32..500,
        ) {
            let (b, _) = calculate(price, seats, None, CODE);
            let base = price * seats as f64;
            prop_assert!((b.base_price - base).abs() < 1e-6);
            prop_assert!((b.total_price - base * 1.23).abs() < 1e-6);
            prop_assert!(b.discount_amount == 0.0);
        }
    }
}

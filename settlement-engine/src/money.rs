//! Money calculation utilities using rust_decimal for precision
//!
//! Source records carry `f64` amounts. All settlement math is done in
//! `Decimal`, then converted back to `f64` (2 decimal places) for summaries.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount settled for a single booking (1e12)
///
/// Booking amounts are capped here before any decimal math. Even `u32::MAX`
/// capped bookings sum to about 4.3e21, well inside the `Decimal` range, so
/// per-booking shares and aggregate sums cannot overflow.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Convert f64 to Decimal
///
/// Non-finite input counts as zero; finite values outside the `Decimal`
/// range saturate to `Decimal::MAX` / `Decimal::MIN`.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        if value.is_finite() {
            tracing::error!(value = ?value, "f64 outside Decimal range in monetary calculation, saturating");
            if value > 0.0 { Decimal::MAX } else { Decimal::MIN }
        } else {
            tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
            Decimal::ZERO
        }
    })
}

/// Convert a booking amount to Decimal, clamped to `[0, MAX_AMOUNT]`
///
/// NaN counts as zero, `+inf` as [`MAX_AMOUNT`].
#[inline]
pub fn non_negative(value: f64) -> Decimal {
    if value > MAX_AMOUNT {
        tracing::warn!(value = ?value, max = MAX_AMOUNT, "Amount above MAX_AMOUNT, capping");
        return to_decimal(MAX_AMOUNT);
    }
    to_decimal(value).max(Decimal::ZERO)
}

/// Round to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Compare two amounts within [`MONEY_TOLERANCE`]
pub fn money_eq(a: f64, b: f64) -> bool {
    to_decimal(a)
        .checked_sub(to_decimal(b))
        .is_some_and(|diff| diff.abs() < MONEY_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_non_finite_defaults_to_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative(-5.0), Decimal::ZERO);
        assert_eq!(non_negative(5.5), to_decimal(5.5));
    }

    #[test]
    fn test_money_eq() {
        assert!(money_eq(10.001, 10.0));
        assert!(!money_eq(10.02, 10.0));
        assert!(!money_eq(1e29, -1e29));
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(to_decimal(1e29), Decimal::MAX);
        assert_eq!(to_decimal(-1e29), Decimal::MIN);
    }

    #[test]
    fn test_amounts_capped_at_max() {
        let max = to_decimal(MAX_AMOUNT);
        assert_eq!(non_negative(1e29), max);
        assert_eq!(non_negative(5e28), max);
        assert_eq!(non_negative(f64::INFINITY), max);
        assert_eq!(non_negative(f64::NAN), Decimal::ZERO);
        assert_eq!(non_negative(MAX_AMOUNT), max);
    }
}

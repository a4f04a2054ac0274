//! Settlement calculator
//!
//! The provider is reimbursed costs first, then receives its percentage of the
//! remaining margin; the agency receives the complement.
//!
//! ```text
//! base         = max(gross - costs, 0)
//! provider_net = clamp(round2(costs + base * pct / 100), 0, gross)
//! agency_net   = gross - provider_net
//! ```
//!
//! Gross and costs are clamped to `[0, MAX_AMOUNT]` and the percentage to
//! `[0, 100]` (NaN as 0) before any decimal math, so
//! `provider_net + agency_net == gross` holds exactly and nothing can overflow.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Booking;

use crate::money::{non_negative, round_money, to_decimal, to_f64};
use crate::percentage::clamp_percentage;

/// Provider and agency shares of one booking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub provider_net: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub agency_net: Decimal,
}

impl SettlementResult {
    /// Always equal to the (clamped) gross amount
    pub fn gross(&self) -> Decimal {
        self.provider_net + self.agency_net
    }

    pub fn provider_net_f64(&self) -> f64 {
        to_f64(self.provider_net)
    }

    pub fn agency_net_f64(&self) -> f64 {
        to_f64(self.agency_net)
    }
}

pub fn compute_settlement(booking: &Booking, percentage: f64) -> SettlementResult {
    let gross = non_negative(booking.gross_amount);
    let costs = non_negative(booking.costs);
    let base = (gross - costs).max(Decimal::ZERO);
    let share = base * to_decimal(clamp_percentage(percentage)) / Decimal::ONE_HUNDRED;

    let provider_net = round_money(costs + share).clamp(Decimal::ZERO, gross);

    SettlementResult {
        provider_net,
        agency_net: gross - provider_net,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{MAX_AMOUNT, MONEY_TOLERANCE};
    use chrono::NaiveDate;

    fn booking(gross: f64, costs: f64) -> Booking {
        Booking {
            costs,
            ..Booking::new("b-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), gross)
        }
    }

    #[test]
    fn test_costs_reimbursed_before_split() {
        let s = compute_settlement(&booking(1000.0, 100.0), 70.0);
        assert_eq!(s.provider_net_f64(), 730.0);
        assert_eq!(s.agency_net_f64(), 270.0);
    }

    #[test]
    fn test_costs_exceeding_gross_clamped() {
        let s = compute_settlement(&booking(100.0, 150.0), 70.0);
        assert_eq!(s.provider_net_f64(), 100.0);
        assert_eq!(s.agency_net_f64(), 0.0);

        let s = compute_settlement(&booking(100.0, 150.0), 0.0);
        assert_eq!(s.provider_net_f64(), 100.0);
        assert_eq!(s.agency_net_f64(), 0.0);
    }

    #[test]
    fn test_out_of_range_percentage_clamped() {
        let s = compute_settlement(&booking(100.0, 0.0), 250.0);
        assert_eq!(s.provider_net_f64(), 100.0);
        assert_eq!(s.agency_net_f64(), 0.0);

        let s = compute_settlement(&booking(100.0, 0.0), -50.0);
        assert_eq!(s.provider_net_f64(), 0.0);
        assert_eq!(s.agency_net_f64(), 100.0);
    }

    #[test]
    fn test_extreme_percentage_does_not_overflow() {
        let s = compute_settlement(&booking(1000.0, 0.0), 1e26);
        assert_eq!(s.provider_net_f64(), 1000.0);
        assert_eq!(s.agency_net_f64(), 0.0);

        let s = compute_settlement(&booking(1000.0, 100.0), f64::NAN);
        assert_eq!(s.provider_net_f64(), 100.0);
        assert_eq!(s.agency_net_f64(), 900.0);

        let s = compute_settlement(&booking(1000.0, 0.0), f64::INFINITY);
        assert_eq!(s.provider_net_f64(), 1000.0);
    }

    #[test]
    fn test_huge_gross_capped_not_zeroed() {
        let s = compute_settlement(&booking(1e29, 0.0), 50.0);
        assert_eq!(s.gross(), to_decimal(MAX_AMOUNT));
        assert_eq!(s.provider_net_f64(), MAX_AMOUNT / 2.0);
        assert_eq!(s.agency_net_f64(), MAX_AMOUNT / 2.0);
    }

    #[test]
    fn test_serializes_as_numbers() {
        let s = compute_settlement(&booking(1000.0, 100.0), 70.0);
        assert_eq!(
            serde_json::to_value(s).unwrap(),
            serde_json::json!({ "providerNet": 730.0, "agencyNet": 270.0 })
        );
    }

    #[test]
    fn test_negative_amounts_clamped_to_zero() {
        let s = compute_settlement(&booking(-200.0, -10.0), 50.0);
        assert_eq!(s, SettlementResult::default());

        let s = compute_settlement(&booking(200.0, -10.0), 50.0);
        assert_eq!(s.provider_net_f64(), 100.0);
    }

    #[test]
    fn test_zero_and_full_percentage() {
        let s = compute_settlement(&booking(500.0, 50.0), 0.0);
        assert_eq!(s.provider_net_f64(), 50.0);
        assert_eq!(s.agency_net_f64(), 450.0);

        let s = compute_settlement(&booking(500.0, 50.0), 100.0);
        assert_eq!(s.provider_net_f64(), 500.0);
        assert_eq!(s.agency_net_f64(), 0.0);
    }

    #[test]
    fn test_conservation_with_awkward_values() {
        let cases = [
            (999.99, 33.33, 33.33),
            (0.01, 0.0, 50.0),
            (1234.56, 1234.55, 66.6),
            (100.0, 0.0, 12.345),
            (87.5, 12.25, 99.99),
        ];
        for (gross, costs, pct) in cases {
            let s = compute_settlement(&booking(gross, costs), pct);
            let diff = (s.gross() - to_decimal(gross)).abs();
            assert!(diff < MONEY_TOLERANCE, "gross={gross} costs={costs} pct={pct}");
            assert!(s.provider_net >= Decimal::ZERO && s.agency_net >= Decimal::ZERO);
        }
    }
}

//! Percentage resolver
//!
//! One place decides which provider share applies to a booking. First match
//! wins:
//!
//! | Level | Source | Condition |
//! |-------|--------|-----------|
//! | 1 | `booking.percentage_override` | finite and within 0-100 |
//! | 2 | `provider.default_split_percentage` | provider known, finite and within 0-100 |
//! | 3 | `100 - agency_default_percentage` | always |
//!
//! Malformed values fall through to the next level; nothing here fails.

use serde::Serialize;
use shared::models::{Booking, Provider};

/// Level that produced the percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageSource {
    Override,
    ProviderDefault,
    AgencyFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPercentage {
    pub percentage: f64,
    pub source: PercentageSource,
}

#[inline]
pub fn is_valid_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Clamp a percentage into 0-100; NaN counts as 0
#[inline]
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Provider share implied by the agency's own default share
///
/// A non-finite agency value counts as 0; out-of-range values are clamped.
pub fn agency_fallback(agency_default_percentage: f64) -> f64 {
    let agency = if agency_default_percentage.is_finite() {
        agency_default_percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    100.0 - agency
}

pub fn resolve_with_source(
    booking: &Booking,
    provider: Option<&Provider>,
    agency_default_percentage: f64,
) -> ResolvedPercentage {
    if let Some(p) = booking.percentage_override
        && is_valid_percentage(p)
    {
        return ResolvedPercentage {
            percentage: p,
            source: PercentageSource::Override,
        };
    }

    if let Some(p) = provider.and_then(|p| p.default_split_percentage)
        && is_valid_percentage(p)
    {
        return ResolvedPercentage {
            percentage: p,
            source: PercentageSource::ProviderDefault,
        };
    }

    ResolvedPercentage {
        percentage: agency_fallback(agency_default_percentage),
        source: PercentageSource::AgencyFallback,
    }
}

/// Provider share (0-100) for one booking
pub fn resolve(booking: &Booking, provider: Option<&Provider>, agency_default_percentage: f64) -> f64 {
    resolve_with_source(booking, provider, agency_default_percentage).percentage
}

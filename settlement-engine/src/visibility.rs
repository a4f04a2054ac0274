//! Visibility filter
//!
//! Decides whether a booking takes part in any calculation. Pure predicates,
//! no side effects.

use shared::models::{Booking, BookingLifecycleState};

use crate::period::Period;

/// Why a booking was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Deleted,
    OutOfWindow,
    OtherProvider,
    Cancelled,
}

/// Lifecycle state used for exclusion (deleted wins over cancelled)
pub fn lifecycle_state(booking: &Booking) -> BookingLifecycleState {
    booking.lifecycle_state()
}

/// No period means no date constraint
pub fn in_window(booking: &Booking, period: Option<&Period>) -> bool {
    period.is_none_or(|p| p.contains(booking.event_date))
}

/// Unassigned bookings never match a provider filter
pub fn matches_provider(booking: &Booking, provider_filter: Option<&str>) -> bool {
    match provider_filter {
        Some(filter) => booking.provider_id.as_deref() == Some(filter),
        None => true,
    }
}

/// First reason the booking is excluded, or `None` if it is eligible
///
/// Checked in order: deleted, window, provider filter, cancelled. A cancelled
/// booking inside the window therefore reports `Cancelled`, which callers use
/// to count it as considered.
pub fn exclusion(
    booking: &Booking,
    period: Option<&Period>,
    provider_filter: Option<&str>,
) -> Option<Exclusion> {
    if lifecycle_state(booking) == BookingLifecycleState::Deleted {
        return Some(Exclusion::Deleted);
    }
    if !in_window(booking, period) {
        return Some(Exclusion::OutOfWindow);
    }
    if !matches_provider(booking, provider_filter) {
        return Some(Exclusion::OtherProvider);
    }
    if lifecycle_state(booking) == BookingLifecycleState::Cancelled {
        return Some(Exclusion::Cancelled);
    }
    None
}

pub fn is_eligible(booking: &Booking, period: Option<&Period>, provider_filter: Option<&str>) -> bool {
    exclusion(booking, period, provider_filter).is_none()
}
